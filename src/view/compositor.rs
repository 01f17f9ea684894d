//! Frame composition.
//!
//! Each frame is built as a [`Scene`] of two layers: the map, sampled through
//! the [`Viewport`], and the tooltip box, blended over it with the tooltip's
//! current opacity.

use crate::geo::Point;
use crate::geo::RectVec;
use crate::gfx::texel::Texel;
use crate::gfx::Scene;
use crate::map::CellGrid;
use crate::map::RegionIndex;
use crate::ui::tooltip;
use crate::ui::tooltip::TooltipController;
use crate::ui::tooltip::TooltipStyle;
use crate::view::Viewport;

/// Z-priority of the map layer.
pub const MAP_LAYER: i32 = 0;
/// Z-priority of the tooltip layer.
pub const TOOLTIP_LAYER: i32 = 10;

/// Builds frames out of the map and its overlays.
pub struct Compositor {
  style: TooltipStyle,
  debug_mode: bool,
}

impl Compositor {
  /// Creates a new `Compositor`, drawing tooltips with `style`.
  pub fn new(style: TooltipStyle) -> Self {
    Self {
      style,
      debug_mode: false,
    }
  }

  /// Returns whether scenes built by this compositor show debug text.
  pub fn debug_mode(&self) -> bool {
    self.debug_mode
  }

  /// Turns debug text on or off.
  pub fn set_debug_mode(&mut self, debug_mode: bool) {
    self.debug_mode = debug_mode;
  }

  /// Samples the visible part of `grid` into a screen-sized image.
  ///
  /// Every screen cell shows the world cell nearest to it, whatever the zoom,
  /// so this does a constant amount of work per screen cell.
  pub fn sample_map(
    &self,
    grid: &CellGrid,
    viewport: &Viewport,
  ) -> RectVec<Texel> {
    let mut image = RectVec::new(viewport.screen(), grid.void().texel());
    for (s, tx) in image.points_mut() {
      *tx = grid.sample(viewport.world_cell(s)).texel();
    }
    image
  }

  /// Draws the tooltip box for `tooltip`, positioned on screen, if there is
  /// anything to show.
  pub fn tooltip_box(
    &self,
    index: &RegionIndex,
    viewport: &Viewport,
    tooltip: &TooltipController,
  ) -> Option<RectVec<Texel>> {
    let label = tooltip.label()?;
    let anchor = tooltip.anchor()?;
    if tooltip.alpha() <= 0.0 {
      return None;
    }

    let mut image = tooltip::render_box(index.region_name(label), &self.style);
    let (dx, dy) = self.style.offset;
    let at = tooltip::place(
      anchor,
      image.dims(),
      Point::new(dx, dy),
      viewport.screen(),
    );
    image.translate(at.upper_left());
    Some(image)
  }

  /// Builds the scene for one frame.
  pub fn compose(
    &self,
    grid: &CellGrid,
    index: &RegionIndex,
    viewport: &Viewport,
    tooltip: &TooltipController,
  ) -> Scene {
    let mut scene =
      Scene::new(viewport.screen(), grid.void().texel(), self.debug_mode);

    let mut map_layer = scene.image_layer(MAP_LAYER);
    map_layer.push(self.sample_map(grid, viewport));
    map_layer.finish();

    if let Some(image) = self.tooltip_box(index, viewport, tooltip) {
      let alpha = tooltip.alpha();
      let mut tooltip_layer = scene.image_layer(TOOLTIP_LAYER);
      tooltip_layer.set_alpha(alpha, alpha * self.style.bg_opacity);
      tooltip_layer.push(image);
      tooltip_layer.finish();
    }

    scene
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::geo::Rect;
  use crate::gfx::texel::Color;
  use crate::gfx::texel::Rgb;
  use crate::map::Cell;
  use crate::ui::tooltip::TooltipTiming;
  use crate::view::region_at;
  use crate::view::ZoomLimits;

  fn world() -> (CellGrid, RegionIndex) {
    let index = RegionIndex::builder()
      .region("Alpha", Rgb::new(255, 0, 0))
      .build()
      .unwrap();
    let mut cells = Vec::new();
    for y in 0..4 {
      for x in 0..4 {
        let glyph = (b'a' + (x + 4 * y) as u8) as char;
        let bg = if x == 3 { Rgb::new(255, 0, 0) } else { Rgb::new(0, 0, 0) };
        cells.push(Cell::painted(glyph, Rgb::new(9, 9, 9), bg));
      }
    }
    let grid = CellGrid::from_raster(4, 4, cells, &index)
      .unwrap()
      .with_void(Rgb::new(1, 2, 3));
    (grid, index)
  }

  fn glyphs(image: &RectVec<Texel>, y: i64) -> String {
    let dims = image.dims();
    (dims.upper_left().x()..dims.lower_right().x())
      .map(|x| image.get(Point::new(x, y)).unwrap().glyph().unwrap())
      .collect()
  }

  #[test]
  fn samples_nearest_cells() {
    let (grid, _) = world();
    let compositor = Compositor::new(TooltipStyle::default());
    let mut viewport = Viewport::new(6, 2, ZoomLimits::default());

    let image = compositor.sample_map(&grid, &viewport);
    assert_eq!(glyphs(&image, 0), "abcd  ");

    viewport.zoom_to(Point::zero(), 2.0);
    let image = compositor.sample_map(&grid, &viewport);
    assert_eq!(glyphs(&image, 0), "abbccd");
    assert_eq!(glyphs(&image, 1), "ijjkkl");

    viewport.zoom_to(Point::zero(), 0.5);
    let image = compositor.sample_map(&grid, &viewport);
    assert_eq!(glyphs(&image, 0), "ac    ");
    assert_eq!(glyphs(&image, 1), "ik    ");
  }

  #[test]
  fn off_map_is_void() {
    let (grid, _) = world();
    let compositor = Compositor::new(TooltipStyle::default());
    let mut viewport = Viewport::new(2, 1, ZoomLimits::default());
    viewport.pan(Point::new(1.0, 0.0));

    let image = compositor.sample_map(&grid, &viewport);
    let void = image.get(Point::new(0, 0)).unwrap();
    assert_eq!(void.bg(), Color::Rgb(Rgb::new(1, 2, 3)));
    assert_eq!(image.get(Point::new(1, 0)).unwrap().glyph(), Some('a'));
    assert!(region_at(&grid, &viewport, Point::new(0, 0)).is_none());
  }

  #[test]
  fn tooltip_is_drawn_beside_the_pointer() {
    let (grid, index) = world();
    let compositor = Compositor::new(TooltipStyle::default());
    let viewport = Viewport::new(20, 6, ZoomLimits::default());
    let mut tip = TooltipController::new(TooltipTiming::default());

    let pointer = Point::new(3, 1);
    let region = region_at(&grid, &viewport, pointer);
    assert_eq!(index.region_name(region), "Alpha");

    tip.on_move(Duration::from_secs(0), pointer, region);
    let mut out = RectVec::empty();
    compositor
      .compose(&grid, &index, &viewport, &tip)
      .flatten(&mut out);
    assert_eq!(out.dims(), Rect::with_dims(20, 6));
    assert_eq!(glyphs(&out, 1), "efgh                ");

    tip.advance(Duration::from_secs(5));
    let mut out = RectVec::empty();
    compositor
      .compose(&grid, &index, &viewport, &tip)
      .flatten(&mut out);
    assert_eq!(glyphs(&out, 1), "efgh ┌─────┐        ");
    assert_eq!(glyphs(&out, 2), "ijkl │Alpha│        ");
    assert_eq!(glyphs(&out, 3), "mnop └─────┘        ");
    assert_eq!(out.get(pointer).unwrap().glyph(), Some('h'));
  }
}

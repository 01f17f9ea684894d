//! The window through which the map is seen.

use crate::geo::Point;
use crate::geo::Rect;

/// Bounds and granularity for zooming.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ZoomLimits {
  /// The smallest allowed zoom factor; must be positive.
  pub min: f64,
  /// The largest allowed zoom factor.
  pub max: f64,
  /// The multiplicative change per wheel notch; must exceed one.
  pub step: f64,
}

impl Default for ZoomLimits {
  fn default() -> Self {
    Self {
      min: 0.05,
      max: 8.0,
      step: 1.1,
    }
  }
}

impl ZoomLimits {
  /// Clamps `zoom` into `[min, max]`.
  #[inline]
  pub fn clamp(&self, zoom: f64) -> f64 {
    zoom.max(self.min).min(self.max)
  }
}

/// A rectangular window onto the world, with an offset and a zoom factor.
///
/// Screen coordinates address the cells of a fixed-size output buffer, with
/// the origin at its upper-left corner. A zoom factor above one magnifies the
/// world (several screen cells per world cell); below one, it minifies.
///
/// The offset is deliberately unconstrained: the viewport may look past the
/// edges of the map, and whatever samples it there is expected to produce a
/// blank cell.
#[derive(Clone, Debug)]
pub struct Viewport {
  // World coordinate under the upper-left corner of the screen.
  offset: Point<f64>,
  // Invariant: limits.min <= zoom <= limits.max, so zoom > 0.
  zoom: f64,
  screen: Rect,
  limits: ZoomLimits,
}

impl Viewport {
  /// Creates a new viewport for a screen of the given size, at zoom 1 (or the
  /// nearest allowed zoom) looking at the world origin.
  pub fn new(width: u16, height: u16, limits: ZoomLimits) -> Self {
    Self {
      offset: Point::zero(),
      zoom: limits.clamp(1.0),
      screen: Rect::with_dims(width as i64, height as i64),
      limits,
    }
  }

  /// Returns the world coordinate under the upper-left corner of the screen.
  pub fn offset(&self) -> Point<f64> {
    self.offset
  }

  /// Returns the current zoom factor.
  pub fn zoom(&self) -> f64 {
    self.zoom
  }

  /// Returns the screen area, in screen coordinates.
  pub fn screen(&self) -> Rect {
    self.screen
  }

  /// Returns the zoom limits.
  pub fn limits(&self) -> ZoomLimits {
    self.limits
  }

  /// Converts a screen position to a world position.
  #[inline]
  pub fn screen_to_world(&self, s: Point<f64>) -> Point<f64> {
    self.offset + s / self.zoom
  }

  /// Converts a world position to a screen position.
  #[inline]
  pub fn world_to_screen(&self, w: Point<f64>) -> Point<f64> {
    (w - self.offset) * self.zoom
  }

  /// Returns the world cell shown in screen cell `s`.
  ///
  /// This is the world cell nearest to the world position of `s`, i.e.,
  /// nearest-neighbor sampling.
  #[inline]
  pub fn world_cell(&self, s: Point) -> Point {
    self.screen_to_world(s.to_f64()).round()
  }

  /// Returns whether `s` is a cell of the screen.
  pub fn contains(&self, s: Point) -> bool {
    self.screen.contains(s)
  }

  /// Sets the zoom factor, clamped to the limits, while keeping the world
  /// position under screen position `s` where it is.
  ///
  /// Returns whether the zoom factor changed.
  pub fn zoom_to(&mut self, s: Point<f64>, zoom: f64) -> bool {
    if !zoom.is_finite() {
      return false;
    }
    let zoom = self.limits.clamp(zoom);
    if zoom == self.zoom {
      return false;
    }

    let anchor = self.screen_to_world(s);
    self.zoom = zoom;
    self.offset = anchor - s / zoom;
    tracing::trace!(zoom, "zoomed");
    true
  }

  /// Zooms by `notches` wheel steps toward screen position `s`.
  ///
  /// Positive notches zoom in. The world position under `s` stays fixed, so
  /// the map appears to grow or shrink around the cursor. Requests past the
  /// limits are clamped to them exactly.
  pub fn zoom_at(&mut self, s: Point<f64>, notches: i32) -> bool {
    if notches == 0 {
      return false;
    }
    self.zoom_to(s, self.zoom * self.limits.step.powi(notches))
  }

  /// Pans the view so that the world appears to move by `d` screen cells.
  #[inline]
  pub fn pan(&mut self, d: Point<f64>) {
    self.offset -= d / self.zoom;
  }

  /// Returns the screen position of the center of the screen.
  pub fn screen_center(&self) -> Point<f64> {
    Point::new(self.screen.width() as f64, self.screen.height() as f64) / 2.0
  }

  /// Moves the view so that world position `w` is at the center of the
  /// screen.
  pub fn center_on(&mut self, w: Point<f64>) {
    self.offset = w - self.screen_center() / self.zoom;
  }

  /// Zooms so that all of `world` fits on the screen, and centers on it.
  pub fn fit(&mut self, world: Rect) {
    if world.is_empty() || self.screen.is_empty() {
      return;
    }
    let zx = self.screen.width() as f64 / world.width() as f64;
    let zy = self.screen.height() as f64 / world.height() as f64;
    self.zoom = self.limits.clamp(zx.min(zy));

    let center = world.upper_left().to_f64()
      + Point::new(world.width() as f64, world.height() as f64) / 2.0;
    self.center_on(center);
  }

  /// Changes the screen size, keeping the world position at the center of
  /// the screen where it is.
  pub fn resize(&mut self, width: u16, height: u16) {
    let center = self.screen_to_world(self.screen_center());
    self.screen = Rect::with_dims(width as i64, height as i64);
    self.center_on(center);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const EPS: f64 = 1e-9;

  fn view() -> Viewport {
    Viewport::new(80, 24, ZoomLimits::default())
  }

  #[test]
  fn identity_transform() {
    let v = view();
    assert_eq!(v.world_cell(Point::new(15, 15)), Point::new(15, 15));
    assert_eq!(v.screen_to_world(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
  }

  #[test]
  fn magnified_cells_repeat() {
    let mut v = view();
    v.zoom_to(Point::zero(), 2.0);
    let row: Vec<_> =
      (0..6).map(|x| v.world_cell(Point::new(x, 0)).x()).collect();
    assert_eq!(row, vec![0, 1, 1, 2, 2, 3]);
  }

  #[test]
  fn quartered_cells_round_to_nearest() {
    let mut v = view();
    v.zoom_to(Point::zero(), 4.0);
    let row: Vec<_> =
      (0..6).map(|x| v.world_cell(Point::new(x, 0)).x()).collect();
    assert_eq!(row, vec![0, 0, 1, 1, 1, 1]);
  }

  #[test]
  fn minified_cells_skip() {
    let mut v = view();
    v.zoom_to(Point::zero(), 0.5);
    let row: Vec<_> =
      (0..4).map(|x| v.world_cell(Point::new(x, 0)).x()).collect();
    assert_eq!(row, vec![0, 2, 4, 6]);
  }

  #[test]
  fn zoom_keeps_cursor_fixed() {
    let mut v = view();
    v.pan(Point::new(-13.0, 7.0));
    let s = Point::new(31.5, 9.5);
    let before = v.screen_to_world(s);
    assert!(v.zoom_at(s, 3));
    assert!(v.screen_to_world(s).approx_eq(before, EPS));
    assert!((v.zoom() - 1.1f64.powi(3)).abs() < EPS);
    assert!(v.zoom_at(s, -7));
    assert!(v.screen_to_world(s).approx_eq(before, EPS));
  }

  #[test]
  fn zoom_clamps_exactly() {
    let mut v = view();
    v.zoom_at(Point::zero(), 1000);
    assert_eq!(v.zoom(), 8.0);
    assert!(!v.zoom_at(Point::zero(), 1));
    v.zoom_at(Point::zero(), -1000);
    assert_eq!(v.zoom(), 0.05);
    assert!(!v.zoom_to(Point::zero(), f64::NAN));
  }

  #[test]
  fn pan_divides_by_zoom() {
    let mut v = view();
    v.zoom_to(Point::zero(), 2.0);
    v.pan(Point::new(4.0, -2.0));
    assert!(v.offset().approx_eq(Point::new(-2.0, 1.0), EPS));
  }

  #[test]
  fn fit_shows_whole_world() {
    let mut v = view();
    v.fit(Rect::with_dims(160, 24));
    assert_eq!(v.zoom(), 0.5);
    assert_eq!(v.world_cell(Point::new(0, 0)).x(), 0);
    assert_eq!(v.world_cell(Point::new(79, 0)).x(), 158);
  }

  #[test]
  fn resize_keeps_center() {
    let mut v = view();
    v.pan(Point::new(5.0, 5.0));
    let center = v.screen_to_world(v.screen_center());
    v.resize(100, 40);
    assert!(v.screen_to_world(v.screen_center()).approx_eq(center, EPS));
    assert_eq!(v.screen(), Rect::with_dims(100, 40));
  }
}

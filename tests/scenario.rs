//! End-to-end scenarios over a small hand-made map.

use std::time::Duration;

use cellmap::geo::Point;
use cellmap::gfx::texel::Rgb;
use cellmap::gfx::texel::colors;
use cellmap::gfx::Curses;
use cellmap::gfx::Renderer;
use cellmap::input::InputEvent;
use cellmap::input::InputRouter;
use cellmap::input::Targets;
use cellmap::map::Cell;
use cellmap::map::CellGrid;
use cellmap::map::RegionIndex;
use cellmap::ui::tooltip::Phase;
use cellmap::ui::tooltip::TooltipController;
use cellmap::ui::tooltip::TooltipStyle;
use cellmap::ui::tooltip::TooltipTiming;
use cellmap::view;
use cellmap::view::Compositor;
use cellmap::view::Viewport;
use cellmap::view::ZoomLimits;

fn alpha_map() -> (CellGrid, RegionIndex) {
  let red = Rgb::new(255, 0, 0);
  let index = RegionIndex::builder().region("Alpha", red).build().unwrap();
  let sea = Cell::painted(' ', colors::WHITE, Rgb::new(0, 0, 90));
  let land = Cell::painted('#', colors::WHITE, red);
  let mut cells = vec![sea; 50 * 50];
  for y in 10..20 {
    for x in 10..20 {
      cells[x + y * 50] = land;
    }
  }
  let grid = CellGrid::from_raster(50, 50, cells, &index).unwrap();
  (grid, index)
}

#[test]
fn pointer_over_alpha_resolves_to_alpha() {
  let (grid, index) = alpha_map();
  let v = Viewport::new(50, 50, ZoomLimits::default());

  let id = view::region_at(&grid, &v, Point::new(15, 15));
  assert_eq!(index.region_name(id), "Alpha");

  // Resolution is idempotent.
  for _ in 0..3 {
    assert_eq!(view::region_at(&grid, &v, Point::new(15, 15)), id);
  }

  // The sea is not a region, and neither is anything off the screen.
  assert!(view::region_at(&grid, &v, Point::new(5, 5)).is_none());
  assert!(view::region_at(&grid, &v, Point::new(50, 15)).is_none());
}

#[test]
fn region_follows_the_view() {
  let (grid, index) = alpha_map();
  let mut v = Viewport::new(50, 50, ZoomLimits::default());
  v.pan(Point::new(-10.0, -10.0));
  let id = view::region_at(&grid, &v, Point::new(5, 5));
  assert_eq!(index.region_name(id), "Alpha");

  // At zoom 2 the screen cell (19, 19) is halfway between world cells 19
  // and 20, and rounds onto the sea.
  v.zoom_to(Point::new(0.0, 0.0), 2.0);
  let id = view::region_at(&grid, &v, Point::new(18, 18));
  assert_eq!(index.region_name(id), "Alpha");
  assert!(view::region_at(&grid, &v, Point::new(19, 19)).is_none());
}

#[test]
fn hover_drag_and_draw() {
  let (grid, index) = alpha_map();
  let mut viewport = Viewport::new(30, 20, ZoomLimits::default());
  let mut tooltip = TooltipController::new(TooltipTiming::default());
  let mut router = InputRouter::new();
  let compositor = Compositor::new(TooltipStyle::default());
  let mut renderer = Renderer::new();
  let mut window = Curses::with(Vec::new()).unwrap();

  let mut send = |e: InputEvent, t: u64| {
    router.dispatch(e, Duration::from_millis(t), Targets {
      grid: &grid,
      viewport: &mut viewport,
      tooltip: &mut tooltip,
    })
  };

  send(InputEvent::Move(Point::new(12, 12)), 0);
  // Dragging the map under a stationary region keeps the dwell going.
  send(InputEvent::DragStart(Point::new(12, 12)), 100);
  send(InputEvent::DragMove(Point::new(13, 12)), 200);
  send(InputEvent::DragEnd(Point::new(13, 12)), 300);
  assert_eq!(viewport.offset(), Point::new(-1.0, 0.0));

  tooltip.advance(Duration::from_millis(1000));
  assert_eq!(tooltip.phase(), Phase::Visible);
  assert_eq!(index.region_name(tooltip.label().unwrap()), "Alpha");

  let scene = compositor.compose(&grid, &index, &viewport, &tooltip);
  let drawn = renderer.bake(scene, &mut window).unwrap();
  assert_eq!(drawn, 30 * 20);

  let scene = compositor.compose(&grid, &index, &viewport, &tooltip);
  assert_eq!(renderer.bake(scene, &mut window).unwrap(), 0);

  // The tooltip sits to the right of the pointer and names the region.
  let row: String = (0..30)
    .map(|x| {
      let p = Point::new(x, 13);
      renderer.frame().get(p).and_then(|t| t.glyph()).unwrap_or(' ')
    })
    .collect();
  assert!(row.contains("Alpha"), "{:?}", row);
}

//! Looking at the map: coordinate transforms and frame composition.

use crate::geo::Point;
use crate::map::CellGrid;
use crate::map::RegionId;

pub mod compositor;
pub mod viewport;

pub use compositor::Compositor;
pub use viewport::Viewport;
pub use viewport::ZoomLimits;

/// Returns the region shown in screen cell `s`.
///
/// Cells off the screen, or showing anything outside the map, resolve to
/// [`RegionId::NONE`].
pub fn region_at(grid: &CellGrid, viewport: &Viewport, s: Point) -> RegionId {
  if !viewport.contains(s) {
    return RegionId::NONE;
  }
  grid.sample(viewport.world_cell(s)).region
}

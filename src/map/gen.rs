//! Procedural demo maps.
//!
//! The viewer is normally handed a map decoded elsewhere; this module paints
//! a stand-in so the binary has something to show. The map is a sea with a
//! few blobby landmasses, each made of overlapping filled discs, framed by an
//! unclaimed border. Background colours are jittered slightly, the way a
//! downscaled bitmap's would be, so region lookup has to rely on the index's
//! colour tolerance.

#![allow(missing_docs)]

use rand::distributions::Distribution as _;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::Rng as _;
use rand::SeedableRng as _;

use crate::geo::Point;
use crate::geo::Rect;
use crate::geo::RectVec;
use crate::gfx::texel::Rgb;
use crate::map::Cell;
use crate::map::CellGrid;
use crate::map::MapError;
use crate::map::RegionIndex;

/// A land or sea region of the demo map.
#[derive(Copy, Clone, Debug)]
pub struct Legend {
  pub name: &'static str,
  pub color: (u8, u8, u8),
  pub glyph: char,
}

impl Legend {
  fn rgb(&self) -> Rgb {
    let (r, g, b) = self.color;
    Rgb::new(r, g, b)
  }
}

/// The sea, which fills everything not covered by land.
pub const SEA: Legend = Legend {
  name: "Mare Nostrum",
  color: (208, 242, 252),
  glyph: '~',
};

/// The landmasses, painted in this order.
pub const LANDS: [Legend; 3] = [
  Legend {
    name: "Rest of the world",
    color: (90, 180, 60),
    glyph: '"',
  },
  Legend {
    name: "W. Europe",
    color: (236, 200, 77),
    glyph: '.',
  },
  Legend {
    name: "Vikings",
    color: (113, 128, 168),
    glyph: '^',
  },
];

/// The colour of the map's frame, which belongs to no region.
pub const FRAME: (u8, u8, u8) = (40, 36, 30);

/// The largest per-channel jitter applied to background colours.
pub const JITTER: i16 = 3;

/// Builds the region index for the demo map.
pub fn legend_index(tolerance: u8) -> Result<RegionIndex, MapError> {
  let mut builder = RegionIndex::builder().tolerance(tolerance);
  for legend in LANDS.iter().chain(std::iter::once(&SEA)) {
    builder = builder.region(legend.name, legend.rgb());
  }
  builder.build()
}

/// A canvas of map cells, painted before regions are assigned.
pub struct Painter {
  cells: RectVec<Cell>,
}

impl Painter {
  pub fn new(width: usize, height: usize, fill: Cell) -> Self {
    Self {
      cells: RectVec::new(Rect::with_dims(width as i64, height as i64), fill),
    }
  }

  /// Paints every cell within `radius` of `center`.
  pub fn fill_disc(&mut self, center: Point, radius: i64, cell: Cell) {
    let r2 = radius * radius;
    let ul = center - Point::new(radius, radius);
    let disc = Rect::new(ul, ul + Point::new(radius * 2 + 1, radius * 2 + 1));
    let area = match disc.intersect(self.cells.dims()) {
      Some(area) => area,
      None => return,
    };
    for p in area.points() {
      let d = p - center;
      if d.x() * d.x() + d.y() * d.y() <= r2 {
        if let Some(slot) = self.cells.get_mut(p) {
          *slot = cell;
        }
      }
    }
  }

  /// Paints the outermost ring of cells.
  pub fn frame(&mut self, cell: Cell) {
    let dims = self.cells.dims();
    for (p, slot) in self.cells.points_mut() {
      let edge = p.x() == 0
        || p.y() == 0
        || p.x() == dims.width() - 1
        || p.y() == dims.height() - 1;
      if edge {
        *slot = cell;
      }
    }
  }

  /// Returns the painted cells, in row-major order.
  pub fn into_cells(self) -> Vec<Cell> {
    self.cells.data().to_vec()
  }
}

fn shade(rgb: Rgb, delta: i16) -> Rgb {
  let f = |c: u8| (c as i16 + delta).max(0).min(255) as u8;
  Rgb::new(f(rgb.red), f(rgb.green), f(rgb.blue))
}

/// Paints a demo map of the given size from `seed`.
///
/// The same seed always produces the same map.
pub fn generate(
  seed: u64,
  width: usize,
  height: usize,
  index: &RegionIndex,
) -> Result<CellGrid, MapError> {
  if width < 3 || height < 3 {
    return Err(MapError::EmptyGrid);
  }

  let mut rng = StdRng::seed_from_u64(seed);
  let sea = Cell::painted(' ', shade(SEA.rgb(), -60), SEA.rgb());
  let mut painter = Painter::new(width, height, sea);

  let xs = Uniform::new(0, width as i64);
  let ys = Uniform::new(0, height as i64);
  let scale = (width.min(height) as i64 / 10).max(2);
  let radii = Uniform::new_inclusive(scale / 2 + 1, scale);
  let steps = Uniform::new_inclusive(-scale, scale);

  for legend in &LANDS {
    let land = Cell::painted(' ', shade(legend.rgb(), -70), legend.rgb());
    for _ in 0..3 {
      // Random-walk a chain of discs to get a ragged coastline.
      let mut center = Point::new(xs.sample(&mut rng), ys.sample(&mut rng));
      for _ in 0..6 {
        painter.fill_disc(center, radii.sample(&mut rng), land);
        center += Point::new(steps.sample(&mut rng), steps.sample(&mut rng));
      }
    }
  }

  let (r, g, b) = FRAME;
  let frame_color = Rgb::new(r, g, b);
  painter.frame(Cell::painted('#', shade(frame_color, 40), frame_color));

  let jitter = Uniform::new_inclusive(-JITTER, JITTER);
  let mut cells = painter.into_cells();
  for cell in &mut cells {
    let legend = LANDS
      .iter()
      .chain(std::iter::once(&SEA))
      .find(|l| l.rgb() == cell.bg);
    if let Some(legend) = legend {
      if rng.gen_bool(0.15) {
        cell.glyph = legend.glyph;
      }
      cell.bg = shade(cell.bg, jitter.sample(&mut rng));
    }
  }

  let grid = CellGrid::from_raster(width, height, cells, index)?;
  tracing::debug!(seed, width, height, "generated demo map");
  Ok(grid)
}

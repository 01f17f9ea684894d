//! The backing map: a grid of colour-coded cells.
//!
//! A [`CellGrid`] is built once at startup from already-decoded cell data and
//! is read-only afterwards. Each [`Cell`] carries the [`RegionId`] it belongs
//! to, resolved through a [`RegionIndex`].

use std::error::Error;
use std::fmt;

use crate::geo::Point;
use crate::geo::Rect;
use crate::geo::RectVec;
use crate::gfx::texel::colors;
use crate::gfx::texel::Rgb;
use crate::gfx::texel::Texel;

pub mod gen;
pub mod region;

pub use region::RegionId;
pub use region::RegionIndex;

/// An error produced while building or querying a map.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MapError {
  /// The grid has zero width or height.
  EmptyGrid,
  /// The number of cells does not match the grid's dimensions.
  SizeMismatch {
    /// `width * height`.
    expected: usize,
    /// The number of cells actually supplied.
    actual: usize,
  },
  /// A world coordinate lies outside the grid.
  OutOfBounds(Point),
  /// Two regions were registered with the same key colour.
  DuplicateColor {
    /// The name of the second region.
    name: String,
    /// The colour both regions share.
    color: [u8; 3],
  },
  /// More regions were registered than there are ids.
  TooManyRegions(usize),
  /// A cell refers to a region missing from the index.
  UnknownRegion {
    /// The offending cell.
    at: Point,
    /// The id it carries.
    id: RegionId,
  },
}

impl fmt::Display for MapError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyGrid => f.write_str("map has no cells"),
      Self::SizeMismatch { expected, actual } => write!(
        f,
        "map dimensions call for {} cells, but {} were supplied",
        expected, actual
      ),
      Self::OutOfBounds(p) => {
        write!(f, "({}, {}) is outside the map", p.x(), p.y())
      }
      Self::DuplicateColor { name, color: [r, g, b] } => write!(
        f,
        "region {:?} reuses the key colour ({}, {}, {})",
        name, r, g, b
      ),
      Self::TooManyRegions(n) => write!(f, "too many regions: {}", n),
      Self::UnknownRegion { at, id } => write!(
        f,
        "cell ({}, {}) belongs to unknown region {}",
        at.x(),
        at.y(),
        id
      ),
    }
  }
}

impl Error for MapError {}

/// A single map cell.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Cell {
  /// The character drawn in this cell.
  pub glyph: char,
  /// The glyph's colour.
  pub fg: Rgb,
  /// The background colour, which also keys the cell's region.
  pub bg: Rgb,
  /// The region this cell belongs to.
  pub region: RegionId,
}

impl Cell {
  /// Creates a cell that does not belong to any region.
  #[inline]
  pub fn painted(glyph: char, fg: Rgb, bg: Rgb) -> Self {
    Self {
      glyph,
      fg,
      bg,
      region: RegionId::NONE,
    }
  }

  /// Creates the blank cell shown outside the map.
  #[inline]
  pub fn empty(void: Rgb) -> Self {
    Self::painted(' ', void, void)
  }

  /// Returns the texel this cell is drawn with.
  #[inline]
  pub fn texel(&self) -> Texel {
    Texel::colored(self.glyph, self.fg, self.bg)
  }
}

/// The backing store for a map: a fixed-size, row-major grid of [`Cell`]s in
/// world coordinates, with its upper-left corner at the origin.
#[derive(Clone, Debug)]
pub struct CellGrid {
  cells: RectVec<Cell>,
  void: Cell,
}

impl CellGrid {
  /// Creates a grid from row-major `cells`.
  pub fn new(
    width: usize,
    height: usize,
    cells: Vec<Cell>,
  ) -> Result<CellGrid, MapError> {
    if width == 0 || height == 0 {
      return Err(MapError::EmptyGrid);
    }

    let expected = width.saturating_mul(height);
    let actual = cells.len();
    let rect = Rect::with_dims(width as i64, height as i64);
    let cells = RectVec::from_vec(rect, cells)
      .ok_or(MapError::SizeMismatch { expected, actual })?;

    Ok(CellGrid {
      cells,
      void: Cell::empty(colors::BLACK),
    })
  }

  /// Creates a grid from decoded, row-major cell data, assigning each cell
  /// the region keyed by its background colour in `index`.
  ///
  /// Any region ids already present in `painted` are ignored.
  pub fn from_raster(
    width: usize,
    height: usize,
    mut painted: Vec<Cell>,
    index: &RegionIndex,
  ) -> Result<CellGrid, MapError> {
    for cell in &mut painted {
      cell.region = index.region_for_color(cell.bg);
    }
    Self::new(width, height, painted)
  }

  /// Returns a copy of this grid which shows `void` outside its bounds.
  pub fn with_void(mut self, void: Rgb) -> Self {
    self.void = Cell::empty(void);
    self
  }

  /// Returns the width of this grid, in cells.
  pub fn width(&self) -> usize {
    self.cells.dims().width() as usize
  }

  /// Returns the height of this grid, in cells.
  pub fn height(&self) -> usize {
    self.cells.dims().height() as usize
  }

  /// Returns the extent of this grid in world coordinates.
  pub fn dims(&self) -> Rect {
    self.cells.dims()
  }

  /// Returns the cell at world coordinate `p`.
  pub fn cell_at(&self, p: Point) -> Result<&Cell, MapError> {
    self.cells.get(p).ok_or(MapError::OutOfBounds(p))
  }

  /// Returns the cell at world coordinate `p`, or the blank "void" cell if
  /// `p` lies outside the grid.
  #[inline]
  pub fn sample(&self, p: Point) -> &Cell {
    self.cells.get(p).unwrap_or(&self.void)
  }

  /// Returns the cell shown outside the grid.
  pub fn void(&self) -> &Cell {
    &self.void
  }

  /// Checks that every region referenced by this grid is named by `index`.
  pub fn check_regions(&self, index: &RegionIndex) -> Result<(), MapError> {
    for (at, cell) in self.cells.points() {
      if !cell.region.is_none() && !index.contains(cell.region) {
        return Err(MapError::UnknownRegion {
          at,
          id: cell.region,
        });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alpha_index() -> RegionIndex {
    RegionIndex::builder()
      .region("Alpha", Rgb::new(255, 0, 0))
      .build()
      .unwrap()
  }

  fn grid_50() -> CellGrid {
    let sea = Cell::painted(' ', colors::WHITE, Rgb::new(0, 0, 90));
    let red = Cell::painted('#', colors::WHITE, Rgb::new(255, 0, 0));
    let mut cells = vec![sea; 50 * 50];
    for y in 10..20 {
      for x in 10..20 {
        cells[x + y * 50] = red;
      }
    }
    CellGrid::from_raster(50, 50, cells, &alpha_index()).unwrap()
  }

  #[test]
  fn raster_cells_get_regions() {
    let grid = grid_50();
    let index = alpha_index();
    let cell = grid.cell_at(Point::new(15, 15)).unwrap();
    assert_eq!(index.region_name(cell.region), "Alpha");
    assert!(grid.cell_at(Point::new(9, 15)).unwrap().region.is_none());
    assert!(grid.check_regions(&index).is_ok());
  }

  #[test]
  fn out_of_bounds() {
    let grid = grid_50().with_void(colors::DARKGRAY);
    assert_eq!(
      grid.cell_at(Point::new(50, 0)),
      Err(MapError::OutOfBounds(Point::new(50, 0)))
    );
    assert!(grid.cell_at(Point::new(-1, 3)).is_err());
    let void = grid.sample(Point::new(-1, 3));
    assert!(void.region.is_none());
    assert_eq!(void.bg, colors::DARKGRAY);
  }

  #[test]
  fn malformed_sources_fail() {
    let cell = Cell::empty(colors::BLACK);
    assert_eq!(
      CellGrid::new(0, 5, Vec::new()).unwrap_err(),
      MapError::EmptyGrid
    );
    assert_eq!(
      CellGrid::new(2, 2, vec![cell; 3]).unwrap_err(),
      MapError::SizeMismatch {
        expected: 4,
        actual: 3
      }
    );
  }

  #[test]
  fn unknown_regions_are_reported() {
    let two = RegionIndex::builder()
      .region("A", Rgb::new(1, 1, 1))
      .region("B", Rgb::new(2, 2, 2))
      .build()
      .unwrap();
    let b = two.region_for_color(Rgb::new(2, 2, 2));
    let mut cells = vec![Cell::empty(colors::BLACK); 4];
    cells[3].region = b;

    let grid = CellGrid::new(2, 2, cells).unwrap();
    assert!(grid.check_regions(&two).is_ok());
    assert_eq!(
      grid.check_regions(&alpha_index()),
      Err(MapError::UnknownRegion {
        at: Point::new(1, 1),
        id: b,
      })
    );
  }
}

//! Geometry for screen and world coordinates.
//!
//! We use the following convention for coordinates: x increases to the right,
//! and y increases downwards. Integer points address cells; floating-point
//! points address positions *within* the continuous plane that cells tile,
//! where cell `(x, y)` covers `[x, x + 1) × [y, y + 1)`.

use num::Float;
use num::Zero;

mod impls;

/// A two-dimensional point.
///
/// `Point<T>` values may be added and subtracted componentwise, and scaled by
/// a scalar.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Point<T = i64>([T; 2]);

impl<T> Point<T> {
  /// Creates a new `Point` with the given coordinates.
  #[inline]
  pub const fn new(x: T, y: T) -> Self {
    Self([x, y])
  }

  /// Creates a new `Point` representing the origin.
  #[inline]
  pub fn zero() -> Self
  where
    T: Zero,
  {
    Self([T::zero(), T::zero()])
  }

  /// Returns this `Point`'s coordinates as an array.
  #[inline]
  pub fn coords(self) -> [T; 2] {
    self.0
  }

  /// Returns the `x` coordinate.
  #[inline]
  pub fn x(self) -> T
  where
    T: Copy,
  {
    self.0[0]
  }

  /// Returns the `y` coordinate.
  #[inline]
  pub fn y(self) -> T
  where
    T: Copy,
  {
    self.0[1]
  }

  /// Applies `f` to each coordinate.
  #[inline]
  pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Point<U> {
    let [x, y] = self.0;
    Point([f(x), f(y)])
  }
}

impl Point<i64> {
  /// Converts a cell coordinate into a floating-point one, addressing the
  /// cell's upper-left corner.
  #[inline]
  pub fn to_f64(self) -> Point<f64> {
    self.map(|c| c as f64)
  }

  /// Returns the point in the middle of the cell this point addresses.
  #[inline]
  pub fn cell_center(self) -> Point<f64> {
    self.to_f64() + Point::new(0.5, 0.5)
  }
}

impl<F: Float> Point<F> {
  /// Returns the nearest cell to this point, rounding halfway coordinates
  /// away from zero.
  #[inline]
  pub fn round(self) -> Point<i64> {
    self.map(|c| c.round().to_i64().unwrap_or(i64::MIN))
  }

  /// Returns whether every coordinate of `self` is within `eps` of `other`.
  #[inline]
  pub fn approx_eq(self, other: Self, eps: F) -> bool {
    (self.x() - other.x()).abs() <= eps && (self.y() - other.y()).abs() <= eps
  }
}

/// A rectangle of cells, represented as a pair of opposing corners.
///
/// The upper-left corner is inclusive; the lower-right corner is exclusive.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Rect(Point, Point);

// Invariant: rect.0.x <= rect.1.x and rect.0.y <= rect.1.y.
impl Rect {
  /// Creates a new `Rect` with the given [`Point`] values as opposing corners.
  #[inline]
  pub fn new(p1: Point, p2: Point) -> Self {
    Self(
      Point::new(p1.x().min(p2.x()), p1.y().min(p2.y())),
      Point::new(p1.x().max(p2.x()), p1.y().max(p2.y())),
    )
  }

  /// Creates a new `Rect` of the given dimensions with one corner at the
  /// origin.
  #[inline]
  pub fn with_dims(width: i64, height: i64) -> Self {
    Self(Point::zero(), Point::new(width.abs(), height.abs()))
  }

  /// Returns the upper-left corner of this `Rect`.
  #[inline]
  pub fn upper_left(self) -> Point {
    self.0
  }

  /// Returns the lower-right corner of this `Rect`.
  #[inline]
  pub fn lower_right(self) -> Point {
    self.1
  }

  /// Returns the width of this `Rect`.
  #[inline]
  pub fn width(self) -> i64 {
    self.1.x() - self.0.x()
  }

  /// Returns the height of this `Rect`.
  #[inline]
  pub fn height(self) -> i64 {
    self.1.y() - self.0.y()
  }

  /// Returns the area of this `Rect`.
  #[inline]
  pub fn area(self) -> i64 {
    self.width() * self.height()
  }

  /// Returns whether this `Rect` has no cells in it.
  #[inline]
  pub fn is_empty(self) -> bool {
    self.area() <= 0
  }

  /// Returns whether this `Rect` contains a given point.
  #[inline]
  pub fn contains(self, p: Point) -> bool {
    (self.0.x()..self.1.x()).contains(&p.x())
      && (self.0.y()..self.1.y()).contains(&p.y())
  }

  /// Computes the intersection of this `Rect` with `other`.
  ///
  /// Returns `None` if they do not intersect at all.
  pub fn intersect(self, other: Rect) -> Option<Rect> {
    let ul =
      Point::new(self.0.x().max(other.0.x()), self.0.y().max(other.0.y()));
    let lr =
      Point::new(self.1.x().min(other.1.x()), self.1.y().min(other.1.y()));

    if ul.x() >= lr.x() || ul.y() >= lr.y() {
      return None;
    }
    Some(Rect(ul, lr))
  }

  /// Translates `self` by the smallest amount that places it inside `bounds`.
  ///
  /// If `self` is larger than `bounds` along some axis, it is aligned with
  /// the upper-left edge of `bounds` along that axis.
  pub fn shifted_into(self, bounds: Rect) -> Rect {
    fn shift(lo: i64, hi: i64, min: i64, max: i64) -> i64 {
      if hi > max {
        (max - hi).max(min - lo)
      } else if lo < min {
        min - lo
      } else {
        0
      }
    }

    let dx = shift(self.0.x(), self.1.x(), bounds.0.x(), bounds.1.x());
    let dy = shift(self.0.y(), self.1.y(), bounds.0.y(), bounds.1.y());
    self + Point::new(dx, dy)
  }

  /// Returns an iterator over all points in this rectangle.
  ///
  /// Points are traversed in row-major order.
  pub fn points(self) -> impl Iterator<Item = Point> {
    let [x1, y1] = self.0.coords();
    let [x2, y2] = self.1.coords();

    (y1..y2).flat_map(move |y| (x1..x2).map(move |x| Point::new(x, y)))
  }
}

/// A rectangle with associated data at each point, stored in row-major order.
// Invariant: self.1.len() == self.0.area()
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct RectVec<T>(Rect, Box<[T]>);

impl<T: Clone> RectVec<T> {
  /// Creates a new, empty `RectVec` with degenerate coordinates.
  pub fn empty() -> Self {
    RectVec(Rect::with_dims(0, 0), Vec::new().into_boxed_slice())
  }

  /// Creates a new `RectVec` with the requested dimensions and filled with the
  /// given value.
  pub fn new(rect: Rect, val: T) -> Self {
    RectVec(rect, vec![val; rect.area().max(0) as usize].into_boxed_slice())
  }

  /// Transforms this `RectVec`'s dimensions to the new rectangle, filling it
  /// with `val` in the process.
  ///
  /// The backing allocation is reused when the area does not change.
  pub fn resize(&mut self, new_rect: Rect, val: T) {
    if self.0.area() == new_rect.area() {
      self.0 = new_rect;
      self.1.iter_mut().for_each(|x| *x = val.clone());
    } else {
      *self = Self::new(new_rect, val);
    }
  }
}

impl<T> RectVec<T> {
  /// Wraps existing row-major data.
  ///
  /// Returns `None` if `data` does not have exactly one element per point of
  /// `rect`.
  pub fn from_vec(rect: Rect, data: Vec<T>) -> Option<Self> {
    if rect.area().max(0) as usize != data.len() {
      return None;
    }
    Some(RectVec(rect, data.into_boxed_slice()))
  }

  /// Returns this `RectVec`'s dimensions.
  pub fn dims(&self) -> Rect {
    self.0
  }

  /// Moves this `RectVec` by `by`, without touching its data.
  pub fn translate(&mut self, by: Point) {
    self.0 = self.0 + by;
  }

  /// Returns this `RectVec`'s data as a linear slice.
  pub fn data(&self) -> &[T] {
    &self.1
  }

  /// Returns this `RectVec`'s data as a mutable linear slice.
  pub fn data_mut(&mut self) -> &mut [T] {
    &mut self.1
  }

  fn index_of(&self, p: Point) -> Option<usize> {
    if !self.0.contains(p) {
      return None;
    }
    let rel = p - self.0.upper_left();
    Some((rel.x() + rel.y() * self.0.width()) as usize)
  }

  /// Gets a reference to the data value associated with `p`.
  ///
  /// Returns `None` if `p` is out-of-bounds.
  pub fn get(&self, p: Point) -> Option<&T> {
    self.index_of(p).and_then(move |i| self.1.get(i))
  }

  /// Gets a mutable reference to the data value associated with `p`.
  ///
  /// Returns `None` if `p` is out-of-bounds.
  pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
    let i = self.index_of(p)?;
    self.1.get_mut(i)
  }

  /// Returns an iterator over the points of this `RectVec` and their associated
  /// values.
  pub fn points(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
    self.0.points().zip(self.1.iter())
  }

  /// Returns an iterator over the points of this `RectVec` and mutable
  /// references to their associated values.
  pub fn points_mut(&mut self) -> impl Iterator<Item = (Point, &mut T)> + '_ {
    self.0.points().zip(self.1.iter_mut())
  }
}

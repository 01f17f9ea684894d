//! Operator overloads.

use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;
use std::ops::SubAssign;

use crate::geo::Point;
use crate::geo::Rect;

#[inline]
fn zip<T, U, V>(x: [T; 2], y: [U; 2], mut f: impl FnMut(T, U) -> V) -> [V; 2] {
  let [x0, x1] = x;
  let [y0, y1] = y;
  [f(x0, y0), f(x1, y1)]
}

impl<T> From<(T, T)> for Point<T> {
  #[inline]
  fn from((x, y): (T, T)) -> Self {
    Self::new(x, y)
  }
}

impl<T: Neg> Neg for Point<T> {
  type Output = Point<T::Output>;
  #[inline]
  fn neg(self) -> Self::Output {
    self.map(|x| -x)
  }
}

impl<T: Add<U>, U> Add<Point<U>> for Point<T> {
  type Output = Point<T::Output>;
  #[inline]
  fn add(self, other: Point<U>) -> Self::Output {
    Point(zip(self.0, other.0, |x, y| x + y))
  }
}

impl<T: Sub<U>, U> Sub<Point<U>> for Point<T> {
  type Output = Point<T::Output>;
  #[inline]
  fn sub(self, other: Point<U>) -> Self::Output {
    Point(zip(self.0, other.0, |x, y| x - y))
  }
}

impl<T: Mul<U>, U: Copy> Mul<U> for Point<T> {
  type Output = Point<T::Output>;
  #[inline]
  fn mul(self, other: U) -> Self::Output {
    self.map(|x| x * other)
  }
}

impl<T: Div<U>, U: Copy> Div<U> for Point<T> {
  type Output = Point<T::Output>;
  #[inline]
  fn div(self, other: U) -> Self::Output {
    self.map(|x| x / other)
  }
}

impl<T: AddAssign<U>, U> AddAssign<Point<U>> for Point<T> {
  #[inline]
  fn add_assign(&mut self, other: Point<U>) {
    let [x, y] = other.0;
    self.0[0] += x;
    self.0[1] += y;
  }
}

impl<T: SubAssign<U>, U> SubAssign<Point<U>> for Point<T> {
  #[inline]
  fn sub_assign(&mut self, other: Point<U>) {
    let [x, y] = other.0;
    self.0[0] -= x;
    self.0[1] -= y;
  }
}

impl Add<Point> for Rect {
  type Output = Rect;
  #[inline]
  fn add(self, other: Point) -> Self::Output {
    Rect(self.0 + other, self.1 + other)
  }
}

impl Sub<Point> for Rect {
  type Output = Rect;
  #[inline]
  fn sub(self, other: Point) -> Self::Output {
    Rect(self.0 - other, self.1 - other)
  }
}

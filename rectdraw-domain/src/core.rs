use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    ops::{Add, Div, Sub},
};

/// Arithmetic needed for coordinates and box extents.
pub trait Calc:
    Add<Output = Self> + Sub<Output = Self> + Div<Output = Self> + PartialOrd + From<u32> + Copy
{
    #[must_use]
    fn two() -> Self {
        Self::from(2)
    }
}
impl<T> Calc for T where
    T: Add<Output = Self> + Sub<Output = Self> + Div<Output = Self> + PartialOrd + From<u32> + Copy
{
}

pub fn floats_close(x: TPtF, y: TPtF) -> bool {
    (x - y).abs() < 1e-10
}

fn min_from_partial<T>(x1: &T, x2: &T) -> Ordering
where
    T: PartialOrd,
{
    match x1.partial_cmp(x2) {
        Some(o) => o,
        None => Ordering::Less,
    }
}
fn max_from_partial<T>(x1: &T, x2: &T) -> Ordering
where
    T: PartialOrd,
{
    match x1.partial_cmp(x2) {
        Some(o) => o,
        None => Ordering::Greater,
    }
}

pub fn min<T>(x1: T, x2: T) -> T
where
    T: PartialOrd,
{
    match min_from_partial(&x1, &x2) {
        Ordering::Greater => x2,
        _ => x1,
    }
}
pub fn max<T>(x1: T, x2: T) -> T
where
    T: PartialOrd,
{
    match max_from_partial(&x1, &x2) {
        Ordering::Less => x2,
        _ => x1,
    }
}

pub type ShapeF = Shape<TPtF>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Shape<T>
where
    T: Calc,
{
    pub w: T,
    pub h: T,
}
impl<T> Shape<T>
where
    T: Calc,
{
    pub fn new(w: T, h: T) -> Self {
        Self { w, h }
    }
    /// Both sides are at least `min_side`
    pub fn is_at_least(&self, min_side: T) -> bool {
        self.w >= min_side && self.h >= min_side
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T>
where
    T: Calc,
{
    /// Midpoint of the segment between `self` and `other`
    pub fn midpoint(&self, other: &Self) -> Self {
        (*self + *other) / T::two()
    }
}

impl PtF {
    pub fn is_close_to(&self, other: Self) -> bool {
        floats_close(self.x, other.x) && floats_close(self.y, other.y)
    }
}

impl<T> Div<T> for Point<T>
where
    T: Calc,
{
    type Output = Self;
    fn div(self, rhs: T) -> Self::Output {
        Point {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}
impl<T> Add for Point<T>
where
    T: Calc,
{
    type Output = Point<T>;
    fn add(self, rhs: Self) -> Self::Output {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> From<(T, T)> for Point<T>
where
    T: Calc,
{
    fn from(value: (T, T)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}
impl From<Point<TPtF>> for [TPtF; 2] {
    fn from(p: Point<TPtF>) -> [TPtF; 2] {
        [p.x, p.y]
    }
}
pub type TPtF = f64;
pub type PtF = Point<TPtF>;

#[test]
fn test_point_ops() {
    let p1 = PtF { x: 1.0, y: 1.0 };
    let p2 = PtF { x: 4.0, y: 3.0 };
    assert!(p1.midpoint(&p2).is_close_to((2.5, 2.0).into()));
    let arr: [TPtF; 2] = p2.into();
    assert_eq!(arr, [4.0, 3.0]);
    assert!(min(f64::NAN, 1.0).is_nan());
    assert_eq!(max(2.0, 1.0), 2.0);
}

#[test]
fn test_shape_at_least() {
    let s = ShapeF::new(0.3, 0.19);
    assert!(!s.is_at_least(0.2));
    assert!(ShapeF::new(0.2, 0.2).is_at_least(0.2));
}

use serde::{Deserialize, Serialize};

use super::{core::Shape, max, min, Calc, Point, TPtF};

pub type BbF = BB<TPtF>;

/// Axis aligned box. `(x, y)` is the corner with the smallest coordinates,
/// whatever direction the axes point to on screen.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BB<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T> BB<T>
where
    T: Calc,
{
    /// `[x, y, w, h]`
    pub fn from_arr(a: &[T; 4]) -> Self {
        BB {
            x: a[0],
            y: a[1],
            w: a[2],
            h: a[3],
        }
    }

    /// Normalizes two arbitrary corners, e.g., anchor and release point of a drag.
    pub fn from_points(p1: Point<T>, p2: Point<T>) -> Self {
        let x_min = min(p1.x, p2.x);
        let y_min = min(p1.y, p2.y);
        let x_max = max(p1.x, p2.x);
        let y_max = max(p1.y, p2.y);
        Self {
            x: x_min,
            y: y_min,
            w: x_max - x_min,
            h: y_max - y_min,
        }
    }

    pub fn x_max(&self) -> T {
        self.x + self.w
    }

    pub fn y_max(&self) -> T {
        self.y + self.h
    }

    pub fn min(&self) -> Point<T> {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn max(&self) -> Point<T> {
        Point {
            x: self.x_max(),
            y: self.y_max(),
        }
    }

    pub fn center(&self) -> Point<T> {
        self.min().midpoint(&self.max())
    }

    pub fn shape(&self) -> Shape<T> {
        Shape {
            w: self.w,
            h: self.h,
        }
    }

    pub fn covers_y(&self, y: T) -> bool {
        self.y_max() >= y && self.y <= y
    }
    pub fn covers_x(&self, x: T) -> bool {
        self.x_max() >= x && self.x <= x
    }

    /// Borders are part of the box.
    pub fn contains<P>(&self, p: P) -> bool
    where
        P: Into<Point<T>>,
    {
        let p = p.into();
        self.covers_x(p.x) && self.covers_y(p.y)
    }
}

#[cfg(test)]
use crate::PtF;

#[test]
fn test_from_points() {
    let bb = BbF::from_points((4.0, 3.0).into(), (1.0, 1.0).into());
    assert_eq!(bb, BbF::from_arr(&[1.0, 1.0, 3.0, 2.0]));
    assert!(bb.center().is_close_to((2.5, 2.0).into()));
    let bb2 = BbF::from_points((1.0, 3.0).into(), (4.0, 1.0).into());
    assert_eq!(bb, bb2);
}

#[test]
fn test_contains() {
    let bb = BbF::from_arr(&[1.0, 1.0, 3.0, 2.0]);
    assert!(bb.contains((1.0, 1.0)));
    assert!(bb.contains((4.0, 3.0)));
    assert!(bb.contains(PtF { x: 2.0, y: 2.5 }));
    assert!(!bb.contains((4.1, 2.0)));
    assert!(!bb.contains((2.0, 0.9)));
}

use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in the 2-D footprint plane.
///
/// Vertical position is handled separately (blocks and surfaces carry
/// `z_min`/`z_max`), so all polygon work stays planar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS && (self.y - other.y).abs() < EPS
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "({:.p$}, {:.p$})", self.x, self.y, p = precision)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let p0 = Point::new(1.0, 2.0);
        let p1 = Point::new(1.0 + 1e-12, 2.0 - 1e-12);
        let p2 = Point::new(1.0001, 2.0);
        assert!(p0.is_close(&p1));
        assert!(!p0.is_close(&p2));
    }

    #[test]
    fn test_add_sub() {
        let p0 = Point::new(1.0, 2.0);
        let p1 = Point::new(0.5, -1.0);
        assert!((p0 + p1).is_close(&Point::new(1.5, 1.0)));
        assert!((p0 - p1).is_close(&Point::new(0.5, 3.0)));
    }
}

use crate::geom::point::Point;
use crate::geom::{is_equal, EPS};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A planar polygon with an outer ring and zero or more hole rings.
///
/// Winding is normalized by the constructors: the outer ring is stored
/// counter-clockwise and holes clockwise, regardless of the order the caller
/// supplied.  Downstream code (offsetting, containment, edge directions)
/// relies on this and never reverses rings itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon from an outer ring.  Rings are open (the first
    /// point is not repeated at the end).
    pub fn new(outer: Vec<Point>) -> Result<Self> {
        if outer.len() < 3 {
            bail!("polygon needs at least 3 vertices, got {}", outer.len());
        }
        if is_equal(ring_signed_area(&outer), 0.0) {
            bail!("degenerate polygon: outer ring has zero area");
        }
        let mut poly = Self {
            outer,
            holes: Vec::new(),
        };
        poly.normalize();
        Ok(poly)
    }

    /// Creates an axis-aligned rectangle.
    pub fn rect(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            outer: vec![
                Point::new(x_min, y_min),
                Point::new(x_max, y_min),
                Point::new(x_max, y_max),
                Point::new(x_min, y_max),
            ],
            holes: Vec::new(),
        }
    }

    /// Adds a hole ring.  Winding is normalized internally.
    pub fn add_hole(&mut self, hole: Vec<Point>) -> Result<()> {
        if hole.len() < 3 {
            bail!("polygon hole needs at least 3 vertices, got {}", hole.len());
        }
        self.holes.push(hole);
        self.normalize();
        Ok(())
    }

    /// Outer ring vertices, counter-clockwise.
    pub fn outer(&self) -> &[Point] {
        &self.outer
    }

    /// Hole rings, each clockwise.
    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    fn normalize(&mut self) {
        if ring_signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if ring_signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
    }

    /// Polygon area (holes subtracted).
    pub fn area(&self) -> f64 {
        let mut area = ring_signed_area(&self.outer);
        for hole in &self.holes {
            // Holes are wound clockwise, so their signed area is negative.
            area += ring_signed_area(hole);
        }
        area
    }

    /// Perimeter of the outer ring.
    pub fn perimeter(&self) -> f64 {
        let n = self.outer.len();
        let mut length = 0.0;
        for i in 0..n {
            let a = self.outer[i];
            let b = self.outer[(i + 1) % n];
            length += ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        }
        length
    }

    /// Axis-aligned bounding box of the outer ring: (min corner, max corner).
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut pmin = self.outer[0];
        let mut pmax = self.outer[0];
        for p in &self.outer {
            pmin.x = pmin.x.min(p.x);
            pmin.y = pmin.y.min(p.y);
            pmax.x = pmax.x.max(p.x);
            pmax.y = pmax.y.max(p.y);
        }
        (pmin, pmax)
    }

    /// Returns a copy translated by (dx, dy).
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        let shift = |pts: &[Point]| {
            pts.iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect::<Vec<Point>>()
        };
        Self {
            outer: shift(&self.outer),
            holes: self.holes.iter().map(|h| shift(h)).collect(),
        }
    }

    /// Checks if a point lies inside the polygon, respecting holes.
    ///
    /// If `boundary_in` is true, points on the outer or hole boundaries are
    /// considered inside.  Cell centers of zero-thickness cells land exactly
    /// on block boundaries, so the assembler always passes `true`.
    pub fn contains(&self, p: Point, boundary_in: bool) -> bool {
        if is_point_on_ring(p, &self.outer) {
            return boundary_in;
        }
        for hole in &self.holes {
            if is_point_on_ring(p, hole) {
                return boundary_in;
            }
        }
        if !is_point_inside_ring(p, &self.outer) {
            return false;
        }
        for hole in &self.holes {
            if is_point_inside_ring(p, hole) {
                return false;
            }
        }
        true
    }
}

/// Signed area of a ring (positive for counter-clockwise winding).
pub fn ring_signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area / 2.0
}

/// Even-odd ray crossing test against one ring (boundary excluded).
fn is_point_inside_ring(p: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Checks if a point lies on any edge of a ring.
fn is_point_on_ring(p: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross.abs() > EPS {
            continue;
        }
        let dot = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
        let len2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
        if dot >= -EPS && dot <= len2 + EPS {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::rect(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_area_and_perimeter() {
        let sq = unit_square();
        assert!((sq.area() - 1.0).abs() < 1e-12);
        assert!((sq.perimeter() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_winding_normalized() {
        // Clockwise input is reversed to counter-clockwise.
        let cw = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        let poly = Polygon::new(cw).unwrap();
        assert!(ring_signed_area(poly.outer()) > 0.0);
    }

    #[test]
    fn test_hole_winding_and_area() {
        let mut poly = Polygon::rect(0.0, 0.0, 4.0, 4.0);
        // Counter-clockwise hole input is reversed to clockwise.
        poly.add_hole(vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 3.0),
        ])
        .unwrap();
        assert!(ring_signed_area(&poly.holes()[0]) < 0.0);
        assert!((poly.area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_containment_with_hole() {
        let mut poly = Polygon::rect(0.0, 0.0, 4.0, 4.0);
        poly.add_hole(vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 3.0),
        ])
        .unwrap();

        assert!(poly.contains(Point::new(0.5, 0.5), false));
        // Inside the hole is outside the polygon.
        assert!(!poly.contains(Point::new(2.0, 2.0), false));
        assert!(!poly.contains(Point::new(5.0, 2.0), false));
        // Boundary points follow the flag.
        assert!(poly.contains(Point::new(0.0, 2.0), true));
        assert!(!poly.contains(Point::new(0.0, 2.0), false));
        assert!(poly.contains(Point::new(1.0, 2.0), true));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let line = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        assert!(Polygon::new(line).is_err());
    }

    #[test]
    fn test_translate_and_bbox() {
        let poly = unit_square().translate(2.0, 3.0);
        let (pmin, pmax) = poly.bounding_box();
        assert!(pmin.is_close(&Point::new(2.0, 3.0)));
        assert!(pmax.is_close(&Point::new(3.0, 4.0)));
    }
}

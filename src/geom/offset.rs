use crate::geom::is_equal;
use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use anyhow::{bail, Result};

/// Outward normal of an axis-aligned polygon edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    XPos,
    XNeg,
    YPos,
    YNeg,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::XPos => Direction::XNeg,
            Direction::XNeg => Direction::XPos,
            Direction::YPos => Direction::YNeg,
            Direction::YNeg => Direction::YPos,
        }
    }

    /// Unit normal vector as (dx, dy).
    fn normal(self) -> (f64, f64) {
        match self {
            Direction::XPos => (1.0, 0.0),
            Direction::XNeg => (-1.0, 0.0),
            Direction::YPos => (0.0, 1.0),
            Direction::YNeg => (0.0, -1.0),
        }
    }
}

/// Classifies the outward normal of the edge leaving vertex `v`.
///
/// Only rectilinear (axis-aligned) footprints are supported; a slanted edge
/// is an input error.  The outer ring is counter-clockwise, so an edge
/// travelling +Y has its outward normal at +X, and so on.
pub fn direction_out(polygon: &Polygon, v: usize) -> Result<Direction> {
    let outer = polygon.outer();
    let n = outer.len();
    let a = outer[v % n];
    let b = outer[(v + 1) % n];
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if is_equal(dx, 0.0) && !is_equal(dy, 0.0) {
        if dy > 0.0 {
            Ok(Direction::XPos)
        } else {
            Ok(Direction::XNeg)
        }
    } else if is_equal(dy, 0.0) && !is_equal(dx, 0.0) {
        if dx > 0.0 {
            Ok(Direction::YNeg)
        } else {
            Ok(Direction::YPos)
        }
    } else {
        bail!(
            "footprint edge {v} is not axis-aligned: {a} -> {b} \
             (only rectilinear footprints are supported)"
        );
    }
}

/// Bounding extent of the edge leaving vertex `v`.
pub fn edge_x_min(polygon: &Polygon, v: usize) -> f64 {
    let (a, b) = edge(polygon, v);
    a.x.min(b.x)
}

pub fn edge_x_max(polygon: &Polygon, v: usize) -> f64 {
    let (a, b) = edge(polygon, v);
    a.x.max(b.x)
}

pub fn edge_y_min(polygon: &Polygon, v: usize) -> f64 {
    let (a, b) = edge(polygon, v);
    a.y.min(b.y)
}

pub fn edge_y_max(polygon: &Polygon, v: usize) -> f64 {
    let (a, b) = edge(polygon, v);
    a.y.max(b.y)
}

fn edge(polygon: &Polygon, v: usize) -> (Point, Point) {
    let outer = polygon.outer();
    let n = outer.len();
    (outer[v % n], outer[(v + 1) % n])
}

/// Returns a polygon whose outer ring is displaced outward (positive
/// `distance`) or inward (negative) by `distance`, preserving rectilinear
/// corners.
///
/// Each vertex moves by the sum of its two adjacent edge normals scaled by
/// `distance`; for a rectilinear corner this is exactly the intersection of
/// the two displaced edges.  An inward offset large enough to flip an edge
/// is a self-intersecting result and fails.
pub fn offset(polygon: &Polygon, distance: f64) -> Result<Polygon> {
    if !polygon.holes().is_empty() {
        bail!("offset of a polygon with holes is not supported");
    }
    let outer = polygon.outer();
    let n = outer.len();

    let mut shifted = Vec::with_capacity(n);
    for v in 0..n {
        let prev = direction_out(polygon, (v + n - 1) % n)?;
        let next = direction_out(polygon, v)?;
        if prev == next || prev == next.opposite() {
            bail!("footprint has collinear or reversing edges at vertex {v}");
        }
        let (pnx, pny) = prev.normal();
        let (nnx, nny) = next.normal();
        shifted.push(Point::new(
            outer[v].x + distance * (pnx + nnx),
            outer[v].y + distance * (pny + nny),
        ));
    }

    // A flipped edge means the inward offset collapsed part of the ring.
    for v in 0..n {
        let old = outer[(v + 1) % n] - outer[v];
        let new = shifted[(v + 1) % n] - shifted[v];
        if old.x * new.x + old.y * new.y <= 0.0 {
            bail!(
                "offset by {distance} produces a self-intersecting polygon \
                 (edge {v} collapsed)"
            );
        }
    }

    Polygon::new(shifted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Polygon {
        // Counter-clockwise L-shaped footprint.
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(6.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 6.0),
            Point::new(0.0, 6.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_direction_out() {
        let poly = l_shape();
        assert_eq!(direction_out(&poly, 0).unwrap(), Direction::YNeg);
        assert_eq!(direction_out(&poly, 1).unwrap(), Direction::XPos);
        assert_eq!(direction_out(&poly, 2).unwrap(), Direction::YPos);
        assert_eq!(direction_out(&poly, 3).unwrap(), Direction::XPos);
        assert_eq!(direction_out(&poly, 4).unwrap(), Direction::YPos);
        assert_eq!(direction_out(&poly, 5).unwrap(), Direction::XNeg);
    }

    #[test]
    fn test_direction_out_rejects_slanted_edge() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 2.0),
        ])
        .unwrap();
        assert!(direction_out(&poly, 1).is_err());
    }

    #[test]
    fn test_edge_extents() {
        let poly = l_shape();
        assert!(is_equal(edge_x_min(&poly, 0), 0.0));
        assert!(is_equal(edge_x_max(&poly, 0), 6.0));
        assert!(is_equal(edge_y_min(&poly, 1), 0.0));
        assert!(is_equal(edge_y_max(&poly, 1), 3.0));
    }

    #[test]
    fn test_offset_outward_square() {
        let sq = Polygon::rect(0.0, 0.0, 4.0, 4.0);
        let out = offset(&sq, 0.5).unwrap();
        let (pmin, pmax) = out.bounding_box();
        assert!(pmin.is_close(&Point::new(-0.5, -0.5)));
        assert!(pmax.is_close(&Point::new(4.5, 4.5)));
        assert!((out.area() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_inward_l_shape() {
        let poly = l_shape();
        let inner = offset(&poly, -0.5).unwrap();
        // Concave corner at (3,3) is the intersection of both displaced
        // edges: x=3 moves to x=2.5 and y=3 moves to y=2.5.
        assert!(inner
            .outer()
            .iter()
            .any(|p| p.is_close(&Point::new(2.5, 2.5))));
        // The outer corners shrink.
        assert!(inner
            .outer()
            .iter()
            .any(|p| p.is_close(&Point::new(0.5, 0.5))));
    }

    #[test]
    fn test_offset_roundtrip_preserves_area() {
        let poly = l_shape();
        let back = offset(&offset(&poly, 1.0).unwrap(), -1.0).unwrap();
        assert!((back.area() - poly.area()).abs() < 1e-9);
    }

    #[test]
    fn test_offset_collapse_fails() {
        let sq = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        assert!(offset(&sq, -0.6).is_err());
    }
}

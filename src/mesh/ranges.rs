use crate::geom::{is_greater_than, is_less_or_equal};
use serde::{Deserialize, Serialize};

/// Zone of a 1-D axis position, used to pick the meshing rule for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Inside the foundation footprint (between near-field bands in 3-D).
    Interior,
    /// Between the axis minimum and the first near-field band.
    MinExterior,
    /// Between the last near-field band and the axis maximum.
    MaxExterior,
    /// Below the deepest construction feature.
    Deep,
    /// The band adjacent to the foundation where fine resolution is needed.
    Near,
}

/// A 1-D interval tagged with a zone kind.
///
/// The interval is half-open: `min` excluded, `max` included.  This choice
/// matters at shared boundaries — a coordinate exactly on the boundary
/// between two ranges belongs to the *lower* one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub kind: ZoneKind,
}

impl Range {
    pub fn new(min: f64, max: f64, kind: ZoneKind) -> Self {
        Self { min, max, kind }
    }
}

/// The full zone partition of one axis.
///
/// Invariant: ranges are disjoint and, together, cover the axis extent with
/// no gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranges {
    pub ranges: Vec<Range>,
}

impl Ranges {
    /// Checks whether `position` falls in a range tagged `kind`.
    ///
    /// Returns false when no range contains the position at all; this is a
    /// valid outcome for a coordinate exactly at the axis minimum (excluded
    /// by the half-open convention) and callers must tolerate it.
    pub fn is_kind(&self, position: f64, kind: ZoneKind) -> bool {
        self.kind_at(position) == Some(kind)
    }

    /// Returns the zone kind of the range containing `position`, if any.
    pub fn kind_at(&self, position: f64) -> Option<ZoneKind> {
        for r in &self.ranges {
            if is_greater_than(position, r.min) && is_less_or_equal(position, r.max) {
                return Some(r.kind);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> Ranges {
        Ranges {
            ranges: vec![
                Range::new(-10.0, -0.5, ZoneKind::Deep),
                Range::new(-0.5, 0.2, ZoneKind::Near),
            ],
        }
    }

    #[test]
    fn test_interior_positions() {
        let r = axis();
        assert!(r.is_kind(-5.0, ZoneKind::Deep));
        assert!(!r.is_kind(-5.0, ZoneKind::Near));
        assert!(r.is_kind(0.0, ZoneKind::Near));
    }

    #[test]
    fn test_boundary_position_belongs_to_lower_range() {
        // Pins the (min, max] convention: a coordinate exactly on a shared
        // boundary is assigned to the range it closes, not the one it opens.
        let r = axis();
        assert!(r.is_kind(-0.5, ZoneKind::Deep));
        assert!(!r.is_kind(-0.5, ZoneKind::Near));
        assert!(r.is_kind(0.2, ZoneKind::Near));
    }

    #[test]
    fn test_axis_minimum_is_outside_all_ranges() {
        let r = axis();
        assert!(!r.is_kind(-10.0, ZoneKind::Deep));
        assert!(!r.is_kind(-10.0, ZoneKind::Near));
    }

    #[test]
    fn test_position_outside_axis() {
        let r = axis();
        assert!(!r.is_kind(1.0, ZoneKind::Near));
        assert!(!r.is_kind(-20.0, ZoneKind::Deep));
    }
}

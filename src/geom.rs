pub mod offset;
pub mod point;
pub mod polygon;

/// Geometric precision
pub const EPS: f64 = 1e-10;

/// Tolerant equality for geometry coordinates.
///
/// All geometry arithmetic in the pipeline is floating point (offsets,
/// translations, area ratios), so deduplication, merging and classification
/// must never compare coordinates with `==`.
pub fn is_equal(first: f64, second: f64) -> bool {
    (first - second).abs() < EPS
}

pub fn is_less_than(first: f64, second: f64) -> bool {
    first < second - EPS
}

pub fn is_less_or_equal(first: f64, second: f64) -> bool {
    first < second + EPS
}

pub fn is_greater_than(first: f64, second: f64) -> bool {
    first > second + EPS
}

pub fn is_greater_or_equal(first: f64, second: f64) -> bool {
    first > second - EPS
}

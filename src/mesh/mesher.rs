use crate::geom::{is_equal, is_less_or_equal, is_less_than};
use crate::mesh::interval::{GrowthDir, Interval};
use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

/// Control coordinates for one axis plus the growth rule for each interval
/// between consecutive points.
///
/// Duplicate adjacent points mark zero-thickness cells; their interval rule
/// is [`Interval::zero_thickness`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub points: Vec<f64>,
    pub intervals: Vec<Interval>,
}

/// The fully meshed axis: every cell edge, cell width and cell center.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesher {
    /// Cell-edge coordinates, sorted; duplicate pairs delimit zero-thickness
    /// cells.
    pub dividers: Vec<f64>,
    /// Cell widths; exactly 0.0 for zero-thickness cells.
    pub deltas: Vec<f64>,
    /// Cell-center coordinates.
    pub centers: Vec<f64>,
}

impl Mesher {
    pub fn new(data: &MeshData) -> Result<Self> {
        ensure!(
            data.points.len() >= 2,
            "axis needs at least 2 control coordinates, got {}",
            data.points.len()
        );
        ensure!(
            data.intervals.len() == data.points.len() - 1,
            "expected {} interval rules for {} control coordinates, got {}",
            data.points.len() - 1,
            data.points.len(),
            data.intervals.len()
        );
        for w in data.points.windows(2) {
            if is_less_than(w[1], w[0]) {
                bail!("control coordinates are not sorted: {} > {}", w[0], w[1]);
            }
        }

        let mut dividers = vec![data.points[0]];
        for (i, rule) in data.intervals.iter().enumerate() {
            rule.validate()?;
            let a = *dividers.last().expect("dividers starts non-empty");
            let b = data.points[i + 1];
            if is_equal(a, b) {
                // Zero-thickness cell: repeat the previous edge exactly so
                // the cell width is 0.0, not floating-point noise.
                dividers.push(a);
            } else {
                dividers.extend(subdivide(a, b, rule));
            }
        }

        let deltas: Vec<f64> = dividers
            .windows(2)
            .map(|w| if is_equal(w[0], w[1]) { 0.0 } else { w[1] - w[0] })
            .collect();
        let centers: Vec<f64> = dividers.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

        Ok(Self {
            dividers,
            deltas,
            centers,
        })
    }

    /// Number of cells along this axis.
    pub fn n_cells(&self) -> usize {
        self.deltas.len()
    }
}

/// Generates the cell edges strictly after `a` up to and including `b`.
fn subdivide(a: f64, b: f64, rule: &Interval) -> Vec<f64> {
    let length = b - a;

    // An interval narrower than the minimum still produces one cell;
    // undersized cells are accepted at domain extremities.
    if is_less_or_equal(length, rule.min_cell_dim) {
        return vec![b];
    }

    let widths = match rule.growth_dir {
        GrowthDir::Uniform => uniform_widths(length, rule.min_cell_dim),
        GrowthDir::Forward => grown_widths(length, rule.min_cell_dim, rule.max_growth_coeff),
        GrowthDir::Backward => {
            let mut w = grown_widths(length, rule.min_cell_dim, rule.max_growth_coeff);
            w.reverse();
            w
        }
        GrowthDir::Centered => centered_widths(length, rule.min_cell_dim, rule.max_growth_coeff),
    };

    let mut edges = Vec::with_capacity(widths.len());
    let mut position = a;
    for w in &widths[..widths.len() - 1] {
        position += w;
        edges.push(position);
    }
    // The last edge is the control coordinate itself, not an accumulation.
    edges.push(b);
    edges
}

fn uniform_widths(length: f64, min_cell_dim: f64) -> Vec<f64> {
    let n = ((length / min_cell_dim).round() as usize).max(1);
    vec![length / n as f64; n]
}

/// Geometric cell widths starting at `min_cell_dim` and growing by `g`.
///
/// The count is the largest whose geometric sum fits the span; all widths
/// are then scaled up uniformly to fill it exactly.  Scaling preserves the
/// adjacent-width ratio (exactly `g`) and keeps every cell at or above the
/// minimum.
fn grown_widths(length: f64, min_cell_dim: f64, g: f64) -> Vec<f64> {
    if is_equal(g, 1.0) {
        return uniform_widths(length, min_cell_dim);
    }

    let geo_sum = |n: u32| min_cell_dim * (g.powi(n as i32) - 1.0) / (g - 1.0);
    let mut n = 1u32;
    while geo_sum(n + 1) <= length {
        n += 1;
    }

    let scale = length / geo_sum(n);
    (0..n)
        .map(|i| min_cell_dim * g.powi(i as i32) * scale)
        .collect()
}

fn centered_widths(length: f64, min_cell_dim: f64, g: f64) -> Vec<f64> {
    let half = length / 2.0;
    if is_less_or_equal(half, min_cell_dim) {
        return uniform_widths(length, min_cell_dim);
    }
    let mut widths = grown_widths(half, min_cell_dim, g);
    let mut mirrored: Vec<f64> = widths.iter().rev().copied().collect();
    widths.append(&mut mirrored);
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_ratio(widths: &[f64]) -> f64 {
        widths
            .windows(2)
            .map(|w| (w[1] / w[0]).max(w[0] / w[1]))
            .fold(1.0, f64::max)
    }

    #[test]
    fn test_uniform_even_division() {
        let data = MeshData {
            points: vec![0.0, 0.3],
            intervals: vec![Interval::new(1.0, 0.05, GrowthDir::Uniform)],
        };
        let mesh = Mesher::new(&data).unwrap();
        assert_eq!(mesh.n_cells(), 6);
        for d in &mesh.deltas {
            assert!((d - 0.05).abs() < 1e-12);
        }
        assert!((mesh.dividers[0] - 0.0).abs() < 1e-12);
        assert!((mesh.dividers[6] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_forward_growth_bounds() {
        let data = MeshData {
            points: vec![0.0, 5.0],
            intervals: vec![Interval::new(1.5, 0.05, GrowthDir::Forward)],
        };
        let mesh = Mesher::new(&data).unwrap();
        assert!(max_ratio(&mesh.deltas) <= 1.5 + 1e-12);
        for d in &mesh.deltas {
            assert!(*d >= 0.05 - 1e-12, "cell below minimum: {d}");
        }
        // Smallest cell sits at the interval start.
        let smallest = mesh.deltas.iter().cloned().fold(f64::MAX, f64::min);
        assert!((mesh.deltas[0] - smallest).abs() < 1e-12);
        // Edges span the interval exactly.
        assert!((mesh.dividers.last().unwrap() - 5.0).abs() < 1e-12);
        let total: f64 = mesh.deltas.iter().sum();
        assert!((total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let fwd = Mesher::new(&MeshData {
            points: vec![0.0, 5.0],
            intervals: vec![Interval::new(1.5, 0.05, GrowthDir::Forward)],
        })
        .unwrap();
        let bwd = Mesher::new(&MeshData {
            points: vec![0.0, 5.0],
            intervals: vec![Interval::new(1.5, 0.05, GrowthDir::Backward)],
        })
        .unwrap();
        assert_eq!(fwd.n_cells(), bwd.n_cells());
        let n = fwd.n_cells();
        for i in 0..n {
            assert!((fwd.deltas[i] - bwd.deltas[n - 1 - i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_centered_interior_scenario() {
        // 2.0 m interior span, min 0.05, growth 1.5.
        let data = MeshData {
            points: vec![0.0, 2.0],
            intervals: vec![Interval::new(1.5, 0.05, GrowthDir::Centered)],
        };
        let mesh = Mesher::new(&data).unwrap();
        assert!(max_ratio(&mesh.deltas) <= 1.5 + 1e-12);
        for d in &mesh.deltas {
            assert!(*d >= 0.05 - 1e-12);
        }
        // Smallest cells at both ends.
        let smallest = mesh.deltas.iter().cloned().fold(f64::MAX, f64::min);
        let n = mesh.n_cells();
        assert!((mesh.deltas[0] - smallest).abs() < 1e-12);
        assert!((mesh.deltas[n - 1] - smallest).abs() < 1e-12);
        // Largest in the middle.
        let largest = mesh.deltas.iter().cloned().fold(0.0, f64::max);
        assert!((mesh.deltas[n / 2] - largest).abs() < 1e-12
            || (mesh.deltas[n / 2 - 1] - largest).abs() < 1e-12);
        let total: f64 = mesh.deltas.iter().sum();
        assert!((total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_undersized_interval_single_cell() {
        let data = MeshData {
            points: vec![0.0, 0.02],
            intervals: vec![Interval::new(1.5, 0.05, GrowthDir::Forward)],
        };
        let mesh = Mesher::new(&data).unwrap();
        assert_eq!(mesh.n_cells(), 1);
        assert!((mesh.deltas[0] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_zero_thickness_cell() {
        let data = MeshData {
            points: vec![0.0, 0.1, 0.1, 0.5],
            intervals: vec![
                Interval::new(1.0, 0.05, GrowthDir::Uniform),
                Interval::zero_thickness(),
                Interval::new(1.0, 0.1, GrowthDir::Uniform),
            ],
        };
        let mesh = Mesher::new(&data).unwrap();
        // 2 cells + zero cell + 4 cells
        assert_eq!(mesh.n_cells(), 7);
        assert_eq!(mesh.deltas[2], 0.0);
        assert!((mesh.centers[2] - 0.1).abs() < 1e-12);
        // Strictly sorted except the intentional duplicate pair.
        let mut duplicates = 0;
        for w in mesh.dividers.windows(2) {
            if w[0] == w[1] {
                duplicates += 1;
            } else {
                assert!(w[0] < w[1]);
            }
        }
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn test_single_cell_rule() {
        let data = MeshData {
            points: vec![0.0, 1.0],
            intervals: vec![Interval::single_cell()],
        };
        let mesh = Mesher::new(&data).unwrap();
        assert_eq!(mesh.n_cells(), 1);
        assert!((mesh.deltas[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_points_rejected() {
        let data = MeshData {
            points: vec![0.0, 0.5, 0.2],
            intervals: vec![Interval::zero_thickness(), Interval::zero_thickness()],
        };
        assert!(Mesher::new(&data).is_err());
    }

    #[test]
    fn test_bad_growth_coeff_rejected() {
        let data = MeshData {
            points: vec![0.0, 1.0],
            intervals: vec![Interval::new(0.8, 0.05, GrowthDir::Forward)],
        };
        assert!(Mesher::new(&data).is_err());
    }
}

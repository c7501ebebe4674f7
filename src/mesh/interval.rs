use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Where in an interval the cells start small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthDir {
    /// All cells the same size.
    Uniform,
    /// Smallest cells at the interval's first coordinate, growing toward
    /// the far end.
    Forward,
    /// Mirror of Forward: smallest cells at the far end.
    Backward,
    /// Smallest cells at both ends, largest in the middle.  Used for the
    /// interior zone in 3-D domains, where near-field effects exist on
    /// multiple sides.
    Centered,
}

/// 1-D meshing rule for one interval between consecutive control
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Maximum ratio between adjacent generated cell widths (>= 1).
    pub max_growth_coeff: f64,
    /// Minimum generated cell width in meters.
    pub min_cell_dim: f64,
    pub growth_dir: GrowthDir,
}

impl Interval {
    pub fn new(max_growth_coeff: f64, min_cell_dim: f64, growth_dir: GrowthDir) -> Self {
        Self {
            max_growth_coeff,
            min_cell_dim,
            growth_dir,
        }
    }

    /// Rule for duplicate-coordinate (zero-thickness) cells.
    pub fn zero_thickness() -> Self {
        Self::new(1.0, 1.0, GrowthDir::Uniform)
    }

    /// Rule producing exactly one cell spanning the interval.
    ///
    /// Used for the unit-width slice axis of 2-D domains.
    pub fn single_cell() -> Self {
        Self::new(1.0, f64::MAX, GrowthDir::Uniform)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_growth_coeff >= 1.0,
            "max growth coefficient must be >= 1, got {}",
            self.max_growth_coeff
        );
        ensure!(
            self.min_cell_dim > 0.0,
            "minimum cell dimension must be positive, got {}",
            self.min_cell_dim
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Interval::new(1.5, 0.05, GrowthDir::Forward).validate().is_ok());
        assert!(Interval::new(0.9, 0.05, GrowthDir::Forward).validate().is_err());
        assert!(Interval::new(1.5, 0.0, GrowthDir::Uniform).validate().is_err());
        assert!(Interval::zero_thickness().validate().is_ok());
    }
}

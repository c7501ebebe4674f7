//! Finite-volume domain assembly.
//!
//! Meshes the three axes produced by the geometry expander, paints cell
//! materials from the blocks (later blocks win), classifies cells and
//! precomputes the conduction coefficients used by the solver stencil.
//!
//! Coefficients are stored per cell and face: `cxp` couples a cell to its
//! +x neighbor, `cxm` to its -x neighbor, and so on.  Face conductivities
//! are distance-weighted harmonic means, so a conductivity jump at a block
//! boundary is handled without smearing.

use crate::expand::{BlockKind, BlockSource, FoundationGeometry, Orientation, SurfaceKind};
use crate::foundation::{CoordinateSystem, Foundation};
use crate::geom::point::Point;
use crate::geom::{is_equal, is_greater_or_equal, is_less_or_equal};
use crate::mesh::mesher::Mesher;
use anyhow::{bail, Result};
use ndarray::Array3;
use std::io::Write;
use tracing::debug;

/// Classification of a finite-volume cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    ExteriorAir,
    ExteriorGrade,
    ExteriorWall,
    InteriorAir,
    InteriorSlab,
    InteriorWall,
    /// Bottom cell of the interior vertical insulation sheet.
    InteriorInsulationEdge,
    WallTop,
    Symmetry,
    FarField,
    DeepGround,
    /// Plain solid cell with no boundary attached.
    Normal,
    /// Zero-width cell not claimed by any boundary surface.
    ZeroThickness,
}

impl CellType {
    /// Single-character code used by [`Domain::print_cell_types`].
    pub fn code(self) -> char {
        match self {
            CellType::ExteriorAir => 'e',
            CellType::ExteriorGrade => 'G',
            CellType::ExteriorWall => 'W',
            CellType::InteriorAir => 'a',
            CellType::InteriorSlab => 'S',
            CellType::InteriorWall => 'w',
            CellType::InteriorInsulationEdge => 'I',
            CellType::WallTop => 'T',
            CellType::Symmetry => 'y',
            CellType::FarField => 'F',
            CellType::DeepGround => 'D',
            CellType::Normal => '.',
            CellType::ZeroThickness => 'z',
        }
    }
}

fn surface_cell_type(kind: SurfaceKind) -> CellType {
    match kind {
        SurfaceKind::Symmetry => CellType::Symmetry,
        SurfaceKind::InteriorWall => CellType::InteriorWall,
        SurfaceKind::InteriorAirSide | SurfaceKind::InteriorAirTop => CellType::InteriorAir,
        SurfaceKind::ExteriorWall => CellType::ExteriorWall,
        SurfaceKind::ExteriorAirSide | SurfaceKind::ExteriorAirTop => CellType::ExteriorAir,
        SurfaceKind::FarField => CellType::FarField,
        SurfaceKind::DeepGround => CellType::DeepGround,
        SurfaceKind::SlabInterior => CellType::InteriorSlab,
        SurfaceKind::Grade => CellType::ExteriorGrade,
        SurfaceKind::WallTop => CellType::WallTop,
    }
}

/// The assembled finite-volume domain.
#[derive(Debug, Clone)]
pub struct Domain {
    pub n_x: usize,
    pub n_y: usize,
    pub n_z: usize,
    pub mesh_x: Mesher,
    pub mesh_y: Mesher,
    pub mesh_z: Mesher,
    pub coordinate_system: CoordinateSystem,

    pub density: Array3<f64>,
    pub specific_heat: Array3<f64>,
    pub conductivity: Array3<f64>,
    pub cell_type: Array3<CellType>,

    /// Conduction coefficients toward the +x / -x neighbors.
    pub cxp: Array3<f64>,
    pub cxm: Array3<f64>,
    /// Axisymmetric first-derivative corrections; zero in cartesian systems.
    pub cxp_c: Array3<f64>,
    pub cxm_c: Array3<f64>,
    pub cyp: Array3<f64>,
    pub cym: Array3<f64>,
    pub czp: Array3<f64>,
    pub czm: Array3<f64>,

    /// z index of the zero-thickness cell row at the slab interior plane.
    pub slab_k: usize,
    pub slab_i_min: usize,
    pub slab_i_max: usize,
    pub slab_j_min: usize,
    pub slab_j_max: usize,
}

impl Domain {
    pub fn new(foundation: &Foundation, geometry: &FoundationGeometry) -> Result<Self> {
        let mesh_x = Mesher::new(&geometry.x_mesh_data)?;
        let mesh_y = Mesher::new(&geometry.y_mesh_data)?;
        let mesh_z = Mesher::new(&geometry.z_mesh_data)?;
        let n_x = mesh_x.n_cells();
        let n_y = mesh_y.n_cells();
        let n_z = mesh_z.n_cells();
        let shape = (n_x, n_y, n_z);

        let mut density = Array3::from_elem(shape, 0.0);
        let mut specific_heat = Array3::from_elem(shape, 0.0);
        let mut conductivity = Array3::from_elem(shape, 0.0);
        let mut cell_type = Array3::from_elem(shape, CellType::Normal);
        let mut matched = Array3::from_elem(shape, false);

        for b in &geometry.blocks {
            let base = match b.kind {
                BlockKind::Solid => CellType::Normal,
                BlockKind::InteriorAir => CellType::InteriorAir,
                BlockKind::ExteriorAir => CellType::ExteriorAir,
            };
            for i in 0..n_x {
                for j in 0..n_y {
                    let p = Point::new(mesh_x.centers[i], mesh_y.centers[j]);
                    if !b.polygon.contains(p, true) {
                        continue;
                    }
                    for k in 0..n_z {
                        let z = mesh_z.centers[k];
                        if !is_greater_or_equal(z, b.z_min) || !is_less_or_equal(z, b.z_max) {
                            continue;
                        }
                        density[[i, j, k]] = b.material.density;
                        specific_heat[[i, j, k]] = b.material.specific_heat;
                        conductivity[[i, j, k]] = b.material.conductivity;
                        matched[[i, j, k]] = true;
                        cell_type[[i, j, k]] = if b.source
                            == BlockSource::InteriorVerticalInsulation
                            && is_equal(mesh_z.dividers[k], b.z_min)
                        {
                            CellType::InteriorInsulationEdge
                        } else {
                            base
                        };
                    }
                }
            }
        }

        // Every cell center must fall in some block; a gap would hand the
        // solver a cell with no material.
        for i in 0..n_x {
            for j in 0..n_y {
                for k in 0..n_z {
                    if !matched[[i, j, k]] {
                        bail!(
                            "unclassified cell ({i}, {j}, {k}) at ({}, {}, {}): \
                             center matches no block",
                            mesh_x.centers[i],
                            mesh_y.centers[j],
                            mesh_z.centers[k]
                        );
                    }
                }
            }
        }

        // Boundary surfaces claim the zero-width cells on their plane.
        let mut claimed = Array3::from_elem(shape, false);
        for s in &geometry.surfaces {
            let t = surface_cell_type(s.kind);
            let (pmin, pmax) = s.polygon.bounding_box();
            match s.orientation {
                Orientation::XPos | Orientation::XNeg => {
                    let plane = s.plane_coordinate();
                    for i in 0..n_x {
                        if mesh_x.deltas[i] != 0.0 || !is_equal(mesh_x.centers[i], plane) {
                            continue;
                        }
                        for j in 0..n_y {
                            let y = mesh_y.centers[j];
                            if !is_greater_or_equal(y, pmin.y) || !is_less_or_equal(y, pmax.y) {
                                continue;
                            }
                            for k in 0..n_z {
                                let z = mesh_z.centers[k];
                                if is_greater_or_equal(z, s.z_min) && is_less_or_equal(z, s.z_max)
                                {
                                    cell_type[[i, j, k]] = t;
                                    claimed[[i, j, k]] = true;
                                }
                            }
                        }
                    }
                }
                Orientation::YPos | Orientation::YNeg => {
                    let plane = s.plane_coordinate();
                    for j in 0..n_y {
                        if mesh_y.deltas[j] != 0.0 || !is_equal(mesh_y.centers[j], plane) {
                            continue;
                        }
                        for i in 0..n_x {
                            let x = mesh_x.centers[i];
                            if !is_greater_or_equal(x, pmin.x) || !is_less_or_equal(x, pmax.x) {
                                continue;
                            }
                            for k in 0..n_z {
                                let z = mesh_z.centers[k];
                                if is_greater_or_equal(z, s.z_min) && is_less_or_equal(z, s.z_max)
                                {
                                    cell_type[[i, j, k]] = t;
                                    claimed[[i, j, k]] = true;
                                }
                            }
                        }
                    }
                }
                Orientation::ZPos | Orientation::ZNeg => {
                    let plane = s.plane_coordinate();
                    for k in 0..n_z {
                        if mesh_z.deltas[k] != 0.0 || !is_equal(mesh_z.centers[k], plane) {
                            continue;
                        }
                        for i in 0..n_x {
                            for j in 0..n_y {
                                let p = Point::new(mesh_x.centers[i], mesh_y.centers[j]);
                                if s.polygon.contains(p, true) {
                                    cell_type[[i, j, k]] = t;
                                    claimed[[i, j, k]] = true;
                                }
                            }
                        }
                    }
                }
            }
        }

        // Remaining zero-width cells carry no boundary condition.
        for i in 0..n_x {
            for j in 0..n_y {
                for k in 0..n_z {
                    if claimed[[i, j, k]] {
                        continue;
                    }
                    if mesh_x.deltas[i] == 0.0
                        || mesh_y.deltas[j] == 0.0
                        || mesh_z.deltas[k] == 0.0
                    {
                        cell_type[[i, j, k]] = CellType::ZeroThickness;
                    }
                }
            }
        }

        let (slab_k, slab_i_min, slab_i_max, slab_j_min, slab_j_max) =
            slab_indices(geometry, &mesh_x, &mesh_y, &mesh_z)?;

        let mut domain = Self {
            n_x,
            n_y,
            n_z,
            mesh_x,
            mesh_y,
            mesh_z,
            coordinate_system: foundation.coordinate_system,
            density,
            specific_heat,
            conductivity,
            cell_type,
            cxp: Array3::from_elem(shape, 0.0),
            cxm: Array3::from_elem(shape, 0.0),
            cxp_c: Array3::from_elem(shape, 0.0),
            cxm_c: Array3::from_elem(shape, 0.0),
            cyp: Array3::from_elem(shape, 0.0),
            cym: Array3::from_elem(shape, 0.0),
            czp: Array3::from_elem(shape, 0.0),
            czm: Array3::from_elem(shape, 0.0),
            slab_k,
            slab_i_min,
            slab_i_max,
            slab_j_min,
            slab_j_max,
        };
        domain.compute_coefficients();

        debug!(
            n_x = domain.n_x,
            n_y = domain.n_y,
            n_z = domain.n_z,
            cells = domain.n_x * domain.n_y * domain.n_z,
            "assembled finite-volume domain"
        );
        Ok(domain)
    }

    /// Center-to-center distance to the +x neighbor.
    ///
    /// Valid for `i < n_x - 1`; the last cell has no +x neighbor.
    pub fn get_dxp(&self, i: usize) -> f64 {
        (self.mesh_x.deltas[i] + self.mesh_x.deltas[i + 1]) / 2.0
    }

    /// Center-to-center distance to the -x neighbor.
    ///
    /// Valid for `i > 0`; the first cell has no -x neighbor.
    pub fn get_dxm(&self, i: usize) -> f64 {
        (self.mesh_x.deltas[i] + self.mesh_x.deltas[i - 1]) / 2.0
    }

    /// Valid for `j < n_y - 1`.
    pub fn get_dyp(&self, j: usize) -> f64 {
        (self.mesh_y.deltas[j] + self.mesh_y.deltas[j + 1]) / 2.0
    }

    /// Valid for `j > 0`.
    pub fn get_dym(&self, j: usize) -> f64 {
        (self.mesh_y.deltas[j] + self.mesh_y.deltas[j - 1]) / 2.0
    }

    /// Valid for `k < n_z - 1`.
    pub fn get_dzp(&self, k: usize) -> f64 {
        (self.mesh_z.deltas[k] + self.mesh_z.deltas[k + 1]) / 2.0
    }

    /// Valid for `k > 0`.
    pub fn get_dzm(&self, k: usize) -> f64 {
        (self.mesh_z.deltas[k] + self.mesh_z.deltas[k - 1]) / 2.0
    }

    /// Face conductivity toward the +x neighbor: distance-weighted harmonic
    /// mean over the two half-cell widths.
    ///
    /// The `get_k*` accessors share the `get_d*` index contracts: a neighbor
    /// in the requested direction must exist.
    pub fn get_kxp(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_x.deltas[i] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_x.deltas[i + 1] / 2.0,
            self.conductivity[[i + 1, j, k]],
        )
    }

    pub fn get_kxm(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_x.deltas[i] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_x.deltas[i - 1] / 2.0,
            self.conductivity[[i - 1, j, k]],
        )
    }

    pub fn get_kyp(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_y.deltas[j] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_y.deltas[j + 1] / 2.0,
            self.conductivity[[i, j + 1, k]],
        )
    }

    pub fn get_kym(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_y.deltas[j] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_y.deltas[j - 1] / 2.0,
            self.conductivity[[i, j - 1, k]],
        )
    }

    pub fn get_kzp(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_z.deltas[k] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_z.deltas[k + 1] / 2.0,
            self.conductivity[[i, j, k + 1]],
        )
    }

    pub fn get_kzm(&self, i: usize, j: usize, k: usize) -> f64 {
        harmonic(
            self.mesh_z.deltas[k] / 2.0,
            self.conductivity[[i, j, k]],
            self.mesh_z.deltas[k - 1] / 2.0,
            self.conductivity[[i, j, k - 1]],
        )
    }

    /// Fills the per-face coefficient arrays.  Cells on a domain boundary
    /// keep 0.0 along that axis; boundary conditions replace the stencil
    /// there.  Interior zero-width cells keep their entries: the
    /// center-to-center distances across a zero face stay positive, so
    /// interface rows remain coupled to both neighbors.
    fn compute_coefficients(&mut self) {
        let axisymmetric = self.coordinate_system == CoordinateSystem::Axisymmetric;
        for i in 0..self.n_x {
            for j in 0..self.n_y {
                for k in 0..self.n_z {
                    if i > 0 && i + 1 < self.n_x {
                        let dxp = self.get_dxp(i);
                        let dxm = self.get_dxm(i);
                        let kxp = self.get_kxp(i, j, k);
                        let kxm = self.get_kxm(i, j, k);
                        self.cxp[[i, j, k]] = 2.0 * kxp / (dxp * (dxp + dxm));
                        self.cxm[[i, j, k]] = 2.0 * kxm / (dxm * (dxp + dxm));
                        if axisymmetric {
                            let r = self.mesh_x.centers[i];
                            self.cxp_c[[i, j, k]] = (kxp / r) * dxm / (dxp * (dxp + dxm));
                            self.cxm_c[[i, j, k]] = (kxm / r) * dxp / (dxm * (dxp + dxm));
                        }
                    }
                    if j > 0 && j + 1 < self.n_y {
                        let dyp = self.get_dyp(j);
                        let dym = self.get_dym(j);
                        self.cyp[[i, j, k]] = 2.0 * self.get_kyp(i, j, k) / (dyp * (dyp + dym));
                        self.cym[[i, j, k]] = 2.0 * self.get_kym(i, j, k) / (dym * (dyp + dym));
                    }
                    if k > 0 && k + 1 < self.n_z {
                        let dzp = self.get_dzp(k);
                        let dzm = self.get_dzm(k);
                        self.czp[[i, j, k]] = 2.0 * self.get_kzp(i, j, k) / (dzp * (dzp + dzm));
                        self.czm[[i, j, k]] = 2.0 * self.get_kzm(i, j, k) / (dzm * (dzp + dzm));
                    }
                }
            }
        }
    }

    /// Dumps one x-z slice of cell-type codes, top row first.
    pub fn print_cell_types<W: Write>(&self, out: &mut W, j: usize) -> std::io::Result<()> {
        for k in (0..self.n_z).rev() {
            for i in 0..self.n_x {
                write!(out, "{}", self.cell_type[[i, j, k]].code())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn harmonic(d1: f64, k1: f64, d2: f64, k2: f64) -> f64 {
    // Two adjacent zero-width cells share a face of zero extent; fall back
    // to the neighbor's conductivity.
    if is_equal(d1, 0.0) && is_equal(d2, 0.0) {
        k2
    } else {
        (d1 + d2) / (d1 / k1 + d2 / k2)
    }
}

fn slab_indices(
    geometry: &FoundationGeometry,
    mesh_x: &Mesher,
    mesh_y: &Mesher,
    mesh_z: &Mesher,
) -> Result<(usize, usize, usize, usize, usize)> {
    let Some(slab) = geometry
        .surfaces
        .iter()
        .find(|s| s.kind == SurfaceKind::SlabInterior)
    else {
        bail!("geometry has no slab interior surface");
    };

    let plane = slab.z_min;
    let Some(slab_k) = (0..mesh_z.n_cells())
        .find(|&k| mesh_z.deltas[k] == 0.0 && is_equal(mesh_z.centers[k], plane))
    else {
        bail!("no zero-thickness cell row at the slab plane z = {plane}");
    };

    let (pmin, pmax) = slab.polygon.bounding_box();
    let within = |centers: &[f64], lo: f64, hi: f64| {
        let idx: Vec<usize> = (0..centers.len())
            .filter(|&i| is_greater_or_equal(centers[i], lo) && is_less_or_equal(centers[i], hi))
            .collect();
        (idx.first().copied(), idx.last().copied())
    };
    let (Some(i_min), Some(i_max)) = within(&mesh_x.centers, pmin.x, pmax.x) else {
        bail!("no cell centers under the slab along x");
    };
    let (Some(j_min), Some(j_max)) = within(&mesh_y.centers, pmin.y, pmax.y) else {
        bail!("no cell centers under the slab along y");
    };

    Ok((slab_k, i_min, i_max, j_min, j_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand;
    use crate::foundation::{
        DeepGroundBoundary, Foundation, Layer, Material, MeshParams, Slab,
    };
    use crate::geom::polygon::Polygon;

    fn slab_foundation(coordinate_system: CoordinateSystem) -> Foundation {
        let soil = Material::new(1.73, 1842.0, 419.0);
        let concrete = Material::new(1.98, 1900.0, 665.0);
        Foundation {
            deep_ground_depth: 5.0,
            far_field_width: 10.0,
            deep_ground_temperature: 283.15,
            excavation_depth: 0.0,
            deep_ground_boundary: DeepGroundBoundary::ZeroFlux,
            indoor_air_temperature: 295.0,
            soil,
            soil_absorptivity: 0.8,
            soil_emissivity: 0.8,
            interior_convective_coefficient: 2.0,
            exterior_convective_coefficient: 15.0,
            initial_temperature: 283.15,
            coordinate_system,
            footprint: Polygon::rect(0.0, 0.0, 10.0, 10.0),
            wall: None,
            slab: Some(Slab {
                emissivity: 0.9,
                layers: vec![Layer::new(concrete, 0.1)],
            }),
            interior_horizontal_insulation: None,
            exterior_horizontal_insulation: None,
            interior_vertical_insulation: None,
            exterior_vertical_insulation: None,
            mesh: MeshParams {
                max_exterior_growth_coeff: 1.5,
                max_interior_growth_coeff: 1.5,
                max_depth_growth_coeff: 1.5,
                min_cell_dim: 0.05,
            },
        }
    }

    fn build(coordinate_system: CoordinateSystem) -> Domain {
        let f = slab_foundation(coordinate_system);
        let g = expand(&f).unwrap();
        Domain::new(&f, &g).unwrap()
    }

    #[test]
    fn test_two_d_slice_is_one_cell_wide() {
        let d = build(CoordinateSystem::Linear);
        assert_eq!(d.n_y, 1);
        assert!((d.mesh_y.deltas[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_harmonic_mean_equal_materials() {
        let d = build(CoordinateSystem::Linear);
        // A soil cell deep below the slab with soil on both sides.
        let k = (0..d.n_z)
            .find(|&k| d.mesh_z.deltas[k] > 0.0 && d.mesh_z.centers[k] < -1.0)
            .unwrap();
        let i = d.n_x / 2;
        assert!((d.get_kxp(i, 0, k) - 1.73).abs() < 1e-12);
        assert!((d.get_kzp(i, 0, k) - 1.73).abs() < 1e-12);
    }

    #[test]
    fn test_harmonic_mean_dominated_by_resistive_side() {
        // Equal half-widths: the harmonic mean sits below the arithmetic
        // mean, pulled toward the resistive material.
        let h = harmonic(0.05, 0.03, 0.05, 1.7);
        assert!((h - 2.0 * 0.03 * 1.7 / (0.03 + 1.7)).abs() < 1e-12);
        assert!(h < (0.03 + 1.7) / 2.0);
    }

    #[test]
    fn test_boundary_cells_keep_zero_coefficients() {
        let d = build(CoordinateSystem::Linear);
        for k in 0..d.n_z {
            assert_eq!(d.cxp[[0, 0, k]], 0.0);
            assert_eq!(d.cxm[[d.n_x - 1, 0, k]], 0.0);
        }
        for i in 0..d.n_x {
            assert_eq!(d.czm[[i, 0, 0]], 0.0);
            assert_eq!(d.czp[[i, 0, d.n_z - 1]], 0.0);
        }
    }

    #[test]
    fn test_axisymmetric_corrections() {
        let d = build(CoordinateSystem::Axisymmetric);
        let k = (0..d.n_z)
            .find(|&k| d.mesh_z.deltas[k] > 0.0 && d.mesh_z.centers[k] < -1.0)
            .unwrap();
        let i = d.n_x / 2;
        let r = d.mesh_x.centers[i];
        let expected = (d.get_kxp(i, 0, k) / r) * d.get_dxm(i)
            / (d.get_dxp(i) * (d.get_dxp(i) + d.get_dxm(i)));
        assert!((d.cxp_c[[i, 0, k]] - expected).abs() < 1e-12);

        let linear = build(CoordinateSystem::Linear);
        assert_eq!(linear.cxp_c[[i, 0, k]], 0.0);
    }

    #[test]
    fn test_slab_cells_classified() {
        let d = build(CoordinateSystem::Linear);
        assert_eq!(d.mesh_z.deltas[d.slab_k], 0.0);
        // The zero-thickness row at the slab plane carries the slab type
        // over the slab extent and the grade type outside it.
        let i_in = (0..d.n_x)
            .find(|&i| d.mesh_x.deltas[i] > 0.0 && d.mesh_x.centers[i] < 5.0)
            .unwrap();
        let i_out = (0..d.n_x)
            .find(|&i| d.mesh_x.deltas[i] > 0.0 && d.mesh_x.centers[i] > 5.0)
            .unwrap();
        assert_eq!(d.cell_type[[i_in, 0, d.slab_k]], CellType::InteriorSlab);
        assert_eq!(d.cell_type[[i_out, 0, d.slab_k]], CellType::ExteriorGrade);
        assert!(d.slab_i_min <= i_in && i_in <= d.slab_i_max);
        assert!(i_out > d.slab_i_max);
    }

    #[test]
    fn test_slab_material_painted_over_soil() {
        let d = build(CoordinateSystem::Linear);
        // A cell inside the slab layer (z in (-0.1, 0), x under the slab).
        let k = (0..d.n_z)
            .find(|&k| {
                d.mesh_z.deltas[k] > 0.0
                    && d.mesh_z.centers[k] > -0.1
                    && d.mesh_z.centers[k] < 0.0
            })
            .unwrap();
        let i = (0..d.n_x)
            .find(|&i| d.mesh_x.deltas[i] > 0.0 && d.mesh_x.centers[i] < 5.0)
            .unwrap();
        assert!((d.conductivity[[i, 0, k]] - 1.98).abs() < 1e-12);
        // Deep soil keeps the soil conductivity.
        let deep = (0..d.n_z).find(|&k| d.mesh_z.centers[k] < -1.0).unwrap();
        assert!((d.conductivity[[i, 0, deep]] - 1.73).abs() < 1e-12);
    }

    #[test]
    fn test_print_cell_types_shape() {
        let d = build(CoordinateSystem::Linear);
        let mut out = Vec::new();
        d.print_cell_types(&mut out, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), d.n_z);
        for line in lines {
            assert_eq!(line.chars().count(), d.n_x);
        }
    }
}

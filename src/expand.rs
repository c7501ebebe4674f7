//! Foundation geometry expander.
//!
//! Turns a [`Foundation`] description into material blocks, boundary
//! surfaces, per-axis zone partitions and per-axis control coordinates with
//! zero-thickness duplicates at flux interfaces.  The expansion runs through
//! an explicit build context and returns an immutable
//! [`FoundationGeometry`]; the input is never mutated.
//!
//! # Pipeline
//!
//! ```text
//! Foundation ──► expand() ──► FoundationGeometry ──► Domain::new()
//!                  │
//!      blocks / surfaces / zone ranges / MeshData per axis
//! ```

mod three_d;
mod two_d;

use crate::foundation::{CoordinateSystem, Foundation, Material};
use crate::geom::polygon::Polygon;
use crate::geom::{is_equal, is_greater_than, is_less_than};
use crate::mesh::interval::{GrowthDir, Interval};
use crate::mesh::mesher::MeshData;
use crate::mesh::ranges::{Range, Ranges, ZoneKind};
use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a block is made of, from the solver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Solid,
    InteriorAir,
    ExteriorAir,
}

/// Which construction feature produced a block.
///
/// The domain assembler needs this to classify insulation edge cells; it is
/// also useful when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSource {
    /// Whole-domain soil block, always emitted first.
    Soil,
    SlabLayer,
    WallLayer,
    InteriorHorizontalInsulation,
    ExteriorHorizontalInsulation,
    InteriorVerticalInsulation,
    ExteriorVerticalInsulation,
    InteriorAir,
    ExteriorAir,
}

/// A material region: a (possibly multiply-connected) plan polygon extruded
/// between `z_min` and `z_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub source: BlockSource,
    pub material: Material,
    pub polygon: Polygon,
    pub z_min: f64,
    pub z_max: f64,
}

/// Boundary-condition family carried by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    ZeroFlux,
    InteriorFlux,
    ExteriorFlux,
    ConstantTemperature,
    InteriorTemperature,
    ExteriorTemperature,
}

/// Outward orientation of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

/// Identity of a boundary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Symmetry,
    InteriorWall,
    InteriorAirSide,
    ExteriorWall,
    ExteriorAirSide,
    FarField,
    DeepGround,
    SlabInterior,
    Grade,
    InteriorAirTop,
    ExteriorAirTop,
    WallTop,
}

impl SurfaceKind {
    /// Human-readable name for reports.
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Symmetry => "Symmetry",
            SurfaceKind::InteriorWall => "Interior Wall",
            SurfaceKind::InteriorAirSide => "Interior Air Side",
            SurfaceKind::ExteriorWall => "Exterior Wall",
            SurfaceKind::ExteriorAirSide => "Exterior Air Side",
            SurfaceKind::FarField => "Far Field",
            SurfaceKind::DeepGround => "Deep Ground",
            SurfaceKind::SlabInterior => "Slab Interior",
            SurfaceKind::Grade => "Grade",
            SurfaceKind::InteriorAirTop => "Interior Air Top",
            SurfaceKind::ExteriorAirTop => "Exterior Air Top",
            SurfaceKind::WallTop => "Wall Top",
        }
    }
}

/// A zero-thickness boundary region: a plan polygon extruded with
/// `z_min == z_max` (horizontal surfaces) or a degenerate plan rectangle
/// with a vertical z extent (vertical surfaces).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub polygon: Polygon,
    pub z_min: f64,
    pub z_max: f64,
    pub boundary: BoundaryKind,
    pub orientation: Orientation,
    pub emissivity: Option<f64>,
    pub absorptivity: Option<f64>,
    pub temperature: Option<f64>,
}

impl Surface {
    pub fn new(
        kind: SurfaceKind,
        polygon: Polygon,
        z_min: f64,
        z_max: f64,
        boundary: BoundaryKind,
        orientation: Orientation,
    ) -> Self {
        Self {
            kind,
            polygon,
            z_min,
            z_max,
            boundary,
            orientation,
            emissivity: None,
            absorptivity: None,
            temperature: None,
        }
    }

    pub fn with_emissivity(mut self, emissivity: f64) -> Self {
        self.emissivity = Some(emissivity);
        self
    }

    pub fn with_absorptivity(mut self, absorptivity: f64) -> Self {
        self.absorptivity = Some(absorptivity);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The coordinate of the plane this surface lies in, along the axis
    /// named by its orientation.
    pub fn plane_coordinate(&self) -> f64 {
        match self.orientation {
            Orientation::XPos | Orientation::XNeg => self.polygon.outer()[0].x,
            Orientation::YPos | Orientation::YNeg => self.polygon.outer()[0].y,
            Orientation::ZPos | Orientation::ZNeg => self.z_min,
        }
    }
}

/// Immutable result of the geometry expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundationGeometry {
    /// Footprint area in m^2.
    pub area: f64,
    /// Footprint perimeter in m.
    pub perimeter: f64,
    /// Characteristic dimension `2*area/perimeter`, used by the 2-D
    /// reductions.
    pub effective_length: f64,
    /// The footprint in domain coordinates (translated for 3-D systems).
    pub footprint: Polygon,
    pub blocks: Vec<Block>,
    pub surfaces: Vec<Surface>,
    pub x_ranges: Ranges,
    pub y_ranges: Ranges,
    pub z_ranges: Ranges,
    pub x_mesh_data: MeshData,
    pub y_mesh_data: MeshData,
    pub z_mesh_data: MeshData,
}

/// Vertical reference elevations and horizontal near extents, derived once
/// and shared by both coordinate-system variants.
///
/// The top of the wall is the zero datum for depths; grade sits at z = 0.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Elevations {
    pub z_max: f64,
    pub z_min: f64,
    pub z_grade: f64,
    pub z_slab: f64,
    pub z_slab_bottom: f64,
    pub z_wall: f64,
    pub z_int_v_ins: f64,
    pub z_ext_v_ins: f64,
    pub z_int_h_ins: f64,
    pub z_ext_h_ins: f64,
    /// Deep/near transition: the lowest elevation reached by any feature.
    pub z_near_deep: f64,
    pub xy_int_h_ins: f64,
    pub xy_ext_h_ins: f64,
    pub xy_wall_interior: f64,
    pub xy_wall_exterior: f64,
    pub xy_near_int: f64,
    pub xy_near_ext: f64,
}

impl Elevations {
    pub(crate) fn derive(f: &Foundation) -> Result<Self> {
        let z_max = f.wall.as_ref().map(|w| w.height - w.depth).unwrap_or(0.0);
        let z_min = -f.deep_ground_depth;
        let z_grade = 0.0;
        let z_slab = z_max - f.excavation_depth;
        let mut z_near_deep = z_slab.min(z_grade);

        let xy_wall_exterior = match (&f.wall, &f.exterior_vertical_insulation) {
            (Some(wall), Some(ins)) => wall.total_width() + ins.layer.thickness,
            (Some(wall), None) => wall.total_width(),
            (None, _) => 0.0,
        };
        let xy_wall_interior = f
            .interior_vertical_insulation
            .as_ref()
            .map(|ins| -ins.layer.thickness)
            .unwrap_or(0.0);

        let mut xy_near_int = xy_wall_interior;
        let mut xy_near_ext = xy_wall_exterior;

        let mut xy_int_h_ins = 0.0;
        let mut z_int_h_ins = 0.0;
        if let Some(ins) = &f.interior_horizontal_insulation {
            xy_int_h_ins = -ins.width;
            z_int_h_ins = z_max - ins.depth - ins.layer.thickness;
            z_near_deep = z_near_deep.min(z_int_h_ins);
            xy_near_int = xy_near_int.min(xy_int_h_ins);
        }

        let mut z_slab_bottom = z_slab;
        if let Some(slab) = &f.slab {
            z_slab_bottom = z_slab - slab.total_width();
            z_near_deep = z_near_deep.min(z_slab_bottom);
        }

        let mut z_int_v_ins = 0.0;
        if let Some(ins) = &f.interior_vertical_insulation {
            z_int_v_ins = z_max - ins.depth;
            z_near_deep = z_near_deep.min(z_int_v_ins);
        }

        let mut z_wall = 0.0;
        if let Some(wall) = &f.wall {
            z_wall = -wall.depth;
            z_near_deep = z_near_deep.min(z_wall);
        }

        let mut z_ext_v_ins = 0.0;
        if let Some(ins) = &f.exterior_vertical_insulation {
            z_ext_v_ins = z_max - ins.depth;
            z_near_deep = z_near_deep.min(z_ext_v_ins);
        }

        let mut xy_ext_h_ins = 0.0;
        let mut z_ext_h_ins = 0.0;
        if let Some(ins) = &f.exterior_horizontal_insulation {
            xy_ext_h_ins = ins.width;
            z_ext_h_ins = z_max - ins.depth - ins.layer.thickness;
            z_near_deep = z_near_deep.min(z_ext_h_ins);
            xy_near_ext = xy_near_ext.max(xy_ext_h_ins);
        }

        ensure!(
            is_less_than(z_min, z_near_deep),
            "deep-ground depth {} does not extend below the deepest \
             construction feature (elevation {})",
            f.deep_ground_depth,
            z_near_deep
        );

        Ok(Self {
            z_max,
            z_min,
            z_grade,
            z_slab,
            z_slab_bottom,
            z_wall,
            z_int_v_ins,
            z_ext_v_ins,
            z_int_h_ins,
            z_ext_h_ins,
            z_near_deep,
            xy_int_h_ins,
            xy_ext_h_ins,
            xy_wall_interior,
            xy_wall_exterior,
            xy_near_int,
            xy_near_ext,
        })
    }
}

/// One interval rule per zone family, derived from the mesh parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntervalPresets {
    pub zero_thickness: Interval,
    pub near: Interval,
    pub deep: Interval,
    pub interior: Interval,
    pub min_exterior: Interval,
    pub max_exterior: Interval,
}

impl IntervalPresets {
    pub(crate) fn derive(f: &Foundation) -> Self {
        let m = &f.mesh;
        let interior_dir = if f.coordinate_system.is_two_d() {
            GrowthDir::Backward
        } else {
            GrowthDir::Centered
        };
        Self {
            zero_thickness: Interval::zero_thickness(),
            near: Interval::new(1.0, m.min_cell_dim, GrowthDir::Uniform),
            deep: Interval::new(m.max_depth_growth_coeff, m.min_cell_dim, GrowthDir::Backward),
            interior: Interval::new(m.max_interior_growth_coeff, m.min_cell_dim, interior_dir),
            min_exterior: Interval::new(
                m.max_exterior_growth_coeff,
                m.min_cell_dim,
                GrowthDir::Backward,
            ),
            max_exterior: Interval::new(
                m.max_exterior_growth_coeff,
                m.min_cell_dim,
                GrowthDir::Forward,
            ),
        }
    }
}

/// Build context threaded through the expansion steps.
#[derive(Debug, Default)]
pub(crate) struct Expansion {
    pub blocks: Vec<Block>,
    pub surfaces: Vec<Surface>,
    pub x_ranges: Ranges,
    pub y_ranges: Ranges,
    pub z_ranges: Ranges,
    pub footprint: Option<Polygon>,
}

/// Expands a foundation description into blocks, surfaces and per-axis mesh
/// data.
pub fn expand(foundation: &Foundation) -> Result<FoundationGeometry> {
    validate(foundation)?;

    let area = foundation.footprint.area();
    let perimeter = foundation.footprint.perimeter();
    ensure!(
        is_greater_than(area, 0.0),
        "footprint has zero area"
    );
    let effective_length = 2.0 * area / perimeter;

    let el = Elevations::derive(foundation)?;
    let mut ctx = Expansion::default();

    // z zones are shared by all coordinate systems: deep below the lowest
    // construction feature, near above it.
    ctx.z_ranges.ranges.push(Range::new(el.z_min, el.z_near_deep, ZoneKind::Deep));
    ctx.z_ranges.ranges.push(Range::new(el.z_near_deep, el.z_max, ZoneKind::Near));

    match foundation.coordinate_system {
        CoordinateSystem::Axisymmetric | CoordinateSystem::Linear => {
            two_d::build(foundation, effective_length, &el, &mut ctx)?;
        }
        CoordinateSystem::ThreeDimensional => {
            three_d::build(foundation, &el, &mut ctx)?;
        }
    }

    let footprint = ctx
        .footprint
        .take()
        .unwrap_or_else(|| foundation.footprint.clone());

    let presets = IntervalPresets::derive(foundation);
    let (x_points, y_points, z_points) = collect_control_points(&ctx.blocks, &ctx.surfaces);

    let x_mesh_data = MeshData {
        intervals: assign_intervals(&x_points, &ctx.x_ranges, &presets)?,
        points: x_points,
    };
    let y_mesh_data = if foundation.coordinate_system.is_two_d() {
        // The unit-width slice is a single cell; it carries no zone
        // information.
        MeshData {
            intervals: vec![Interval::single_cell(); y_points.len() - 1],
            points: y_points,
        }
    } else {
        MeshData {
            intervals: assign_intervals(&y_points, &ctx.y_ranges, &presets)?,
            points: y_points,
        }
    };
    let z_mesh_data = MeshData {
        intervals: assign_intervals(&z_points, &ctx.z_ranges, &presets)?,
        points: z_points,
    };

    debug!(
        blocks = ctx.blocks.len(),
        surfaces = ctx.surfaces.len(),
        x_points = x_mesh_data.points.len(),
        y_points = y_mesh_data.points.len(),
        z_points = z_mesh_data.points.len(),
        "expanded foundation geometry"
    );

    Ok(FoundationGeometry {
        area,
        perimeter,
        effective_length,
        footprint,
        blocks: ctx.blocks,
        surfaces: ctx.surfaces,
        x_ranges: ctx.x_ranges,
        y_ranges: ctx.y_ranges,
        z_ranges: ctx.z_ranges,
        x_mesh_data,
        y_mesh_data,
        z_mesh_data,
    })
}

fn validate(f: &Foundation) -> Result<()> {
    ensure!(
        f.deep_ground_depth > 0.0,
        "deep-ground depth must be positive, got {}",
        f.deep_ground_depth
    );
    ensure!(
        f.far_field_width > 0.0,
        "far-field width must be positive, got {}",
        f.far_field_width
    );
    ensure!(
        f.excavation_depth >= 0.0,
        "excavation depth cannot be negative, got {}",
        f.excavation_depth
    );
    ensure!(
        f.mesh.min_cell_dim > 0.0,
        "minimum cell dimension must be positive, got {}",
        f.mesh.min_cell_dim
    );
    for (name, coeff) in [
        ("exterior", f.mesh.max_exterior_growth_coeff),
        ("interior", f.mesh.max_interior_growth_coeff),
        ("depth", f.mesh.max_depth_growth_coeff),
    ] {
        ensure!(
            coeff >= 1.0,
            "{name} growth coefficient must be >= 1, got {coeff}"
        );
    }
    if let Some(slab) = &f.slab {
        ensure!(!slab.layers.is_empty(), "slab has no layers");
    }
    if let Some(wall) = &f.wall {
        ensure!(!wall.layers.is_empty(), "wall has no layers");
        ensure!(
            wall.height >= wall.depth,
            "wall height {} is less than its below-grade depth {}",
            wall.height,
            wall.depth
        );
    }
    Ok(())
}

/// Collects, per axis, every block/surface boundary coordinate, then
/// re-inserts each surface's plane coordinate as a duplicate so the mesher
/// produces a zero-thickness cell at every flux interface.
fn collect_control_points(
    blocks: &[Block],
    surfaces: &[Surface],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut x_points = Vec::new();
    let mut y_points = Vec::new();
    let mut z_points = Vec::new();
    let mut x_surfaces = Vec::new();
    let mut y_surfaces = Vec::new();
    let mut z_surfaces = Vec::new();

    for s in surfaces {
        for p in s.polygon.outer().iter().chain(s.polygon.holes().iter().flatten()) {
            x_points.push(p.x);
            y_points.push(p.y);
        }
        z_points.push(s.z_min);
        z_points.push(s.z_max);

        match s.orientation {
            Orientation::XPos | Orientation::XNeg => x_surfaces.push(s.plane_coordinate()),
            Orientation::YPos | Orientation::YNeg => y_surfaces.push(s.plane_coordinate()),
            Orientation::ZPos | Orientation::ZNeg => z_surfaces.push(s.plane_coordinate()),
        }
    }

    for b in blocks {
        for p in b.polygon.outer().iter().chain(b.polygon.holes().iter().flatten()) {
            x_points.push(p.x);
            y_points.push(p.y);
        }
        z_points.push(b.z_min);
        z_points.push(b.z_max);
    }

    let mut x_points = sorted_dedup(x_points);
    let mut y_points = sorted_dedup(y_points);
    let mut z_points = sorted_dedup(z_points);

    // One duplicate per distinct surface plane.
    x_points.extend(sorted_dedup(x_surfaces));
    y_points.extend(sorted_dedup(y_surfaces));
    z_points.extend(sorted_dedup(z_surfaces));

    x_points.sort_by(f64::total_cmp);
    y_points.sort_by(f64::total_cmp);
    z_points.sort_by(f64::total_cmp);

    (x_points, y_points, z_points)
}

/// Sorts and removes tolerantly equal duplicates in one forward pass.
fn sorted_dedup(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        match out.last() {
            Some(last) if is_equal(*last, v) => {}
            _ => out.push(v),
        }
    }
    out
}

/// Picks the growth rule for every 1-D cell: duplicate coordinates get the
/// zero-thickness rule, everything else the rule of the zone its upper
/// coordinate falls into.
fn assign_intervals(
    points: &[f64],
    ranges: &Ranges,
    presets: &IntervalPresets,
) -> Result<Vec<Interval>> {
    let mut intervals = Vec::with_capacity(points.len().saturating_sub(1));
    for i in 1..points.len() {
        if is_equal(points[i], points[i - 1]) {
            intervals.push(presets.zero_thickness);
            continue;
        }
        let kind = ranges.kind_at(points[i]);
        let interval = match kind {
            Some(ZoneKind::Interior) => presets.interior,
            Some(ZoneKind::Near) => presets.near,
            Some(ZoneKind::MinExterior) => presets.min_exterior,
            Some(ZoneKind::MaxExterior) => presets.max_exterior,
            Some(ZoneKind::Deep) => presets.deep,
            None => bail!(
                "coordinate {} falls in no configured zone range; \
                 the axis partition has a gap",
                points[i]
            ),
        };
        intervals.push(interval);
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_dedup_tolerant() {
        let v = vec![0.3, 0.1, 0.1 + 1e-13, 0.2, 0.3];
        let out = sorted_dedup(v);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.1).abs() < 1e-12);
        assert!((out[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_assign_intervals_zero_thickness_and_zones() {
        let ranges = Ranges {
            ranges: vec![
                Range::new(0.0, 1.0, ZoneKind::Interior),
                Range::new(1.0, 2.0, ZoneKind::MaxExterior),
            ],
        };
        let presets = IntervalPresets {
            zero_thickness: Interval::zero_thickness(),
            near: Interval::new(1.0, 0.05, GrowthDir::Uniform),
            deep: Interval::new(1.5, 0.05, GrowthDir::Backward),
            interior: Interval::new(1.2, 0.05, GrowthDir::Backward),
            min_exterior: Interval::new(1.5, 0.05, GrowthDir::Backward),
            max_exterior: Interval::new(1.5, 0.05, GrowthDir::Forward),
        };
        let points = vec![0.0, 0.5, 0.5, 2.0];
        let intervals = assign_intervals(&points, &ranges, &presets).unwrap();
        assert_eq!(intervals[0], presets.interior);
        assert_eq!(intervals[1], presets.zero_thickness);
        assert_eq!(intervals[2], presets.max_exterior);
    }

    #[test]
    fn test_assign_intervals_gap_is_error() {
        let ranges = Ranges {
            ranges: vec![Range::new(0.0, 1.0, ZoneKind::Interior)],
        };
        let presets = IntervalPresets {
            zero_thickness: Interval::zero_thickness(),
            near: Interval::new(1.0, 0.05, GrowthDir::Uniform),
            deep: Interval::new(1.5, 0.05, GrowthDir::Backward),
            interior: Interval::new(1.2, 0.05, GrowthDir::Backward),
            min_exterior: Interval::new(1.5, 0.05, GrowthDir::Backward),
            max_exterior: Interval::new(1.5, 0.05, GrowthDir::Forward),
        };
        let points = vec![0.0, 0.5, 3.0];
        assert!(assign_intervals(&points, &ranges, &presets).is_err());
    }
}

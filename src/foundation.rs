//! Declarative description of a building foundation.
//!
//! This is the input side of the pipeline: footprint, construction layer
//! stacks and site parameters.  Parsing these from an input file belongs to
//! an external collaborator; the types here only define the data model.

use crate::geom::polygon::Polygon;
use serde::{Deserialize, Serialize};

/// Physical constants of a material region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Thermal conductivity in W/(m*K).
    pub conductivity: f64,
    /// Density in kg/m^3.
    pub density: f64,
    /// Specific heat capacity in J/(kg*K).
    pub specific_heat: f64,
}

impl Material {
    pub fn new(conductivity: f64, density: f64, specific_heat: f64) -> Self {
        Self {
            conductivity,
            density,
            specific_heat,
        }
    }

    /// Still air, used for the interior and exterior air blocks.
    pub fn air() -> Self {
        Self::new(0.02587, 1.275, 1007.0)
    }
}

/// A material layer of given thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub material: Material,
    /// Thickness in meters.
    pub thickness: f64,
}

impl Layer {
    pub fn new(material: Material, thickness: f64) -> Self {
        Self {
            material,
            thickness,
        }
    }
}

/// Foundation wall: layer stack ordered from the footprint outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub interior_emissivity: f64,
    pub exterior_emissivity: f64,
    pub exterior_absorptivity: f64,
    /// Below-grade depth in meters.
    pub depth: f64,
    /// Total height in meters (above wall bottom).
    pub height: f64,
    pub layers: Vec<Layer>,
}

impl Wall {
    /// Sum of layer thicknesses in meters.
    pub fn total_width(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}

/// Floor slab: layer stack ordered bottom-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub emissivity: f64,
    pub layers: Vec<Layer>,
}

impl Slab {
    /// Sum of layer thicknesses in meters.
    pub fn total_width(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}

/// Horizontal insulation strip along the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalInsulation {
    /// Depth from top of wall in meters.
    pub depth: f64,
    /// Width from the side of the wall in meters.
    pub width: f64,
    pub layer: Layer,
}

/// Vertical insulation sheet along the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalInsulation {
    /// Depth from top of wall in meters.
    pub depth: f64,
    pub layer: Layer,
}

/// Mesh growth parameters, one coefficient per zone family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    pub max_exterior_growth_coeff: f64,
    pub max_interior_growth_coeff: f64,
    pub max_depth_growth_coeff: f64,
    /// Minimum cell dimension in meters.
    pub min_cell_dim: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// 2-D axisymmetric: x is the radius from the symmetry axis.
    Axisymmetric,
    /// 2-D linear slice of unit width.
    Linear,
    /// Full 3-D cartesian.
    ThreeDimensional,
}

impl CoordinateSystem {
    pub fn is_two_d(self) -> bool {
        matches!(self, Self::Axisymmetric | Self::Linear)
    }
}

/// Boundary condition applied at the deep-ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeepGroundBoundary {
    /// Constant temperature from the water table (default).
    Auto,
    ConstantTemperature,
    ZeroFlux,
}

/// The foundation description consumed by the geometry expander.
///
/// Absent constructions are `None`; the expander reads the presence of each
/// feature from the option itself.  Solver-facing inputs (air temperatures,
/// convective coefficients) travel with the description but are not used by
/// the meshing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Foundation {
    // Site
    /// Depth of the deep-ground boundary below grade in meters.
    pub deep_ground_depth: f64,
    /// Distance from the outside of the wall to the domain edge in meters.
    pub far_field_width: f64,
    /// Deep-ground temperature in K.
    pub deep_ground_temperature: f64,
    /// Excavation depth below top of wall in meters.
    pub excavation_depth: f64,
    pub deep_ground_boundary: DeepGroundBoundary,
    /// Indoor air temperature in K (consumed by the external solver).
    pub indoor_air_temperature: f64,
    pub soil: Material,
    pub soil_absorptivity: f64,
    pub soil_emissivity: f64,
    /// Interior convective film coefficient in W/(m^2*K) (solver input).
    pub interior_convective_coefficient: f64,
    /// Exterior convective film coefficient in W/(m^2*K) (solver input).
    pub exterior_convective_coefficient: f64,
    /// Initial ground temperature in K (solver input).
    pub initial_temperature: f64,

    // Geometry
    pub coordinate_system: CoordinateSystem,
    /// Building footprint, taken at the interior side of the wall.
    pub footprint: Polygon,

    // Constructions
    pub wall: Option<Wall>,
    pub slab: Option<Slab>,
    pub interior_horizontal_insulation: Option<HorizontalInsulation>,
    pub exterior_horizontal_insulation: Option<HorizontalInsulation>,
    pub interior_vertical_insulation: Option<VerticalInsulation>,
    pub exterior_vertical_insulation: Option<VerticalInsulation>,

    // Meshing
    pub mesh: MeshParams,
}

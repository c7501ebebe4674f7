//! 2-D expansion (axisymmetric and linear).
//!
//! Both 2-D systems reduce the footprint to its effective length
//! `2*area/perimeter` and mesh a unit-width slice: x runs from the symmetry
//! plane at 0 through the wall to the far field, z from the deep ground to
//! the top of the wall.  Polygons degenerate to rectangles in the slice.

use crate::expand::{
    Block, BlockKind, BlockSource, BoundaryKind, Elevations, Expansion, Orientation, Surface,
    SurfaceKind,
};
use crate::foundation::{DeepGroundBoundary, Foundation, Material};
use crate::geom::polygon::Polygon;
use crate::geom::{is_greater_than, is_less_than};
use crate::mesh::ranges::{Range, ZoneKind};
use anyhow::{ensure, Result};

pub(crate) fn build(
    f: &Foundation,
    effective_length: f64,
    el: &Elevations,
    ctx: &mut Expansion,
) -> Result<()> {
    let x_min = 0.0;
    let x_max = effective_length + f.far_field_width;
    let x_ref = effective_length;

    // A vertical slice surface: degenerate rectangle at one x plane.
    let x_plane = |x: f64| Polygon::rect(x, 0.0, x, 1.0);
    // A horizontal slice surface or block footprint.
    let x_span = |x0: f64, x1: f64| Polygon::rect(x0, 0.0, x1, 1.0);

    let wall_interior_emissivity = f.wall.as_ref().map(|w| w.interior_emissivity);

    // Symmetry plane below the slab.
    ctx.surfaces.push(Surface::new(
        SurfaceKind::Symmetry,
        x_plane(x_min),
        el.z_min,
        el.z_slab,
        BoundaryKind::ZeroFlux,
        Orientation::XNeg,
    ));

    if is_greater_than(f.excavation_depth, 0.0) {
        let mut interior_wall = Surface::new(
            SurfaceKind::InteriorWall,
            x_plane(x_ref + el.xy_wall_interior),
            el.z_slab,
            el.z_max,
            BoundaryKind::InteriorFlux,
            Orientation::XNeg,
        );
        interior_wall.emissivity = wall_interior_emissivity;
        ctx.surfaces.push(interior_wall);

        ctx.surfaces.push(Surface::new(
            SurfaceKind::InteriorAirSide,
            x_plane(x_min),
            el.z_slab,
            el.z_max,
            BoundaryKind::InteriorTemperature,
            Orientation::XNeg,
        ));
    }

    if is_greater_than(el.z_max, 0.0) {
        let mut exterior_wall = Surface::new(
            SurfaceKind::ExteriorWall,
            x_plane(x_ref + el.xy_wall_exterior),
            el.z_grade,
            el.z_max,
            BoundaryKind::ExteriorFlux,
            Orientation::XPos,
        );
        if let Some(wall) = &f.wall {
            exterior_wall.emissivity = Some(wall.exterior_emissivity);
            exterior_wall.absorptivity = Some(wall.exterior_absorptivity);
        }
        ctx.surfaces.push(exterior_wall);

        ctx.surfaces.push(Surface::new(
            SurfaceKind::ExteriorAirSide,
            x_plane(x_max),
            el.z_grade,
            el.z_max,
            BoundaryKind::ExteriorTemperature,
            Orientation::XPos,
        ));
    }

    ctx.surfaces.push(Surface::new(
        SurfaceKind::FarField,
        x_plane(x_max),
        el.z_min,
        el.z_grade,
        BoundaryKind::ZeroFlux,
        Orientation::XPos,
    ));

    let deep_ground = Surface::new(
        SurfaceKind::DeepGround,
        x_span(x_min, x_max),
        el.z_min,
        el.z_min,
        match f.deep_ground_boundary {
            DeepGroundBoundary::Auto | DeepGroundBoundary::ConstantTemperature => {
                BoundaryKind::ConstantTemperature
            }
            DeepGroundBoundary::ZeroFlux => BoundaryKind::ZeroFlux,
        },
        Orientation::ZNeg,
    );
    ctx.surfaces.push(match f.deep_ground_boundary {
        DeepGroundBoundary::Auto | DeepGroundBoundary::ConstantTemperature => {
            deep_ground.with_temperature(f.deep_ground_temperature)
        }
        DeepGroundBoundary::ZeroFlux => deep_ground,
    });

    let mut slab_interior = Surface::new(
        SurfaceKind::SlabInterior,
        x_span(x_min, x_ref + el.xy_wall_interior),
        el.z_slab,
        el.z_slab,
        BoundaryKind::InteriorFlux,
        Orientation::ZPos,
    );
    slab_interior.emissivity = f
        .slab
        .as_ref()
        .map(|s| s.emissivity)
        .or(wall_interior_emissivity);
    ctx.surfaces.push(slab_interior);

    ctx.surfaces.push(
        Surface::new(
            SurfaceKind::Grade,
            x_span(x_ref + el.xy_wall_exterior, x_max),
            el.z_grade,
            el.z_grade,
            BoundaryKind::ExteriorFlux,
            Orientation::ZPos,
        )
        .with_emissivity(f.soil_emissivity)
        .with_absorptivity(f.soil_absorptivity),
    );

    if is_greater_than(f.excavation_depth, 0.0) {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::InteriorAirTop,
            x_span(x_min, x_ref + el.xy_wall_interior),
            el.z_max,
            el.z_max,
            BoundaryKind::InteriorTemperature,
            Orientation::ZPos,
        ));
    }

    if is_greater_than(el.z_max, 0.0) {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::ExteriorAirTop,
            x_span(x_ref + el.xy_wall_exterior, x_max),
            el.z_max,
            el.z_max,
            BoundaryKind::ExteriorTemperature,
            Orientation::ZPos,
        ));
    }

    if f.wall.is_some() {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::WallTop,
            x_span(x_ref + el.xy_wall_interior, x_ref + el.xy_wall_exterior),
            el.z_max,
            el.z_max,
            BoundaryKind::ZeroFlux,
            Orientation::ZPos,
        ));
    }

    // Blocks, in paint order: later blocks win where regions touch.  Soil
    // fills the whole domain first so every cell center matches a block.
    ctx.blocks.push(Block {
        kind: BlockKind::Solid,
        source: BlockSource::Soil,
        material: f.soil,
        polygon: x_span(x_min, x_max),
        z_min: el.z_min,
        z_max: el.z_max,
    });

    if let Some(ins) = &f.interior_horizontal_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::InteriorHorizontalInsulation,
            material: ins.layer.material,
            polygon: x_span(x_ref + el.xy_int_h_ins, x_ref),
            z_min: el.z_int_h_ins,
            z_max: el.z_int_h_ins + ins.layer.thickness,
        });
    }

    if let Some(slab) = &f.slab {
        let mut z_position = el.z_slab_bottom;
        for layer in &slab.layers {
            ctx.blocks.push(Block {
                kind: BlockKind::Solid,
                source: BlockSource::SlabLayer,
                material: layer.material,
                polygon: x_span(x_min, x_ref),
                z_min: z_position,
                z_max: z_position + layer.thickness,
            });
            z_position += layer.thickness;
        }
    }

    if let Some(ins) = &f.interior_vertical_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::InteriorVerticalInsulation,
            material: ins.layer.material,
            polygon: x_span(x_ref + el.xy_wall_interior, x_ref),
            z_min: el.z_int_v_ins,
            z_max: el.z_max,
        });
    }

    ctx.blocks.push(Block {
        kind: BlockKind::InteriorAir,
        source: BlockSource::InteriorAir,
        material: Material::air(),
        polygon: x_span(x_min, x_ref + el.xy_wall_interior),
        z_min: el.z_slab,
        z_max: el.z_max,
    });

    if let Some(wall) = &f.wall {
        // Layers run from the footprint outward.
        let mut x_position = x_ref;
        for layer in &wall.layers {
            ctx.blocks.push(Block {
                kind: BlockKind::Solid,
                source: BlockSource::WallLayer,
                material: layer.material,
                polygon: x_span(x_position, x_position + layer.thickness),
                z_min: el.z_wall,
                z_max: el.z_max,
            });
            x_position += layer.thickness;
        }
    }

    let wall_width = f.wall.as_ref().map(|w| w.total_width()).unwrap_or(0.0);

    if let Some(ins) = &f.exterior_vertical_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::ExteriorVerticalInsulation,
            material: ins.layer.material,
            polygon: x_span(x_ref + wall_width, x_ref + el.xy_wall_exterior),
            z_min: el.z_ext_v_ins,
            z_max: el.z_max,
        });
    }

    if let Some(ins) = &f.exterior_horizontal_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::ExteriorHorizontalInsulation,
            material: ins.layer.material,
            polygon: x_span(x_ref + wall_width, x_ref + el.xy_ext_h_ins),
            z_min: el.z_ext_h_ins,
            z_max: el.z_ext_h_ins + ins.layer.thickness,
        });
    }

    ctx.blocks.push(Block {
        kind: BlockKind::ExteriorAir,
        source: BlockSource::ExteriorAir,
        material: Material::air(),
        polygon: x_span(x_ref + el.xy_wall_exterior, x_max),
        z_min: el.z_grade,
        z_max: el.z_max,
    });

    // x zones: interior up to the near band, near band around the wall,
    // exterior out to the far field.
    let near_min = x_ref + el.xy_near_int;
    let near_max = x_ref + el.xy_near_ext;
    ensure!(
        is_greater_than(near_min, x_min),
        "near-field band reaches the symmetry plane; the interior zone is \
         empty (near extent {} vs effective length {})",
        el.xy_near_int,
        x_ref
    );
    ensure!(
        is_less_than(near_max, x_max),
        "near-field band reaches the domain edge; the exterior zone is \
         empty (near extent {} vs far-field width {})",
        el.xy_near_ext,
        f.far_field_width
    );
    ctx.x_ranges
        .ranges
        .push(Range::new(x_min, near_min, ZoneKind::Interior));
    ctx.x_ranges
        .ranges
        .push(Range::new(near_min, near_max, ZoneKind::Near));
    ctx.x_ranges
        .ranges
        .push(Range::new(near_max, x_max, ZoneKind::MaxExterior));

    Ok(())
}

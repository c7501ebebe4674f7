//! 3-D expansion.
//!
//! The footprint is translated so the domain starts at the origin with a
//! far-field margin on every side.  Construction features become rings of
//! offset polygons around the footprint; wall surfaces are emitted per
//! rectilinear edge with the edge's outward orientation.

use crate::expand::{
    Block, BlockKind, BlockSource, BoundaryKind, Elevations, Expansion, Orientation, Surface,
    SurfaceKind,
};
use crate::foundation::{DeepGroundBoundary, Foundation, Material};
use crate::geom::offset::{
    direction_out, edge_x_max, edge_x_min, edge_y_max, edge_y_min, offset, Direction,
};
use crate::geom::polygon::Polygon;
use crate::geom::{is_greater_than, is_less_or_equal, is_less_than};
use crate::mesh::ranges::{Range, Ranges, ZoneKind};
use anyhow::{ensure, Result};

pub(crate) fn build(f: &Foundation, el: &Elevations, ctx: &mut Expansion) -> Result<()> {
    let (bb_min, bb_max) = f.footprint.bounding_box();
    let fp = f
        .footprint
        .translate(f.far_field_width - bb_min.x, f.far_field_width - bb_min.y);

    let x_min = 0.0;
    let y_min = 0.0;
    let x_max = 2.0 * f.far_field_width + (bb_max.x - bb_min.x);
    let y_max = 2.0 * f.far_field_width + (bb_max.y - bb_min.y);

    let poly_int = offset(&fp, el.xy_wall_interior)?;
    let poly_ext = offset(&fp, el.xy_wall_exterior)?;
    let domain_rect = Polygon::rect(x_min, y_min, x_max, y_max);

    let wall_interior_emissivity = f.wall.as_ref().map(|w| w.interior_emissivity);

    if is_greater_than(f.excavation_depth, 0.0) {
        // The wall's interior face, one surface per footprint edge, facing
        // back into the excavated space.
        for v in 0..poly_int.outer().len() {
            let out = direction_out(&poly_int, v)?;
            let mut s = Surface::new(
                SurfaceKind::InteriorWall,
                edge_plane(&poly_int, v, out),
                el.z_slab,
                el.z_max,
                BoundaryKind::InteriorFlux,
                orientation(out.opposite()),
            );
            s.emissivity = wall_interior_emissivity;
            ctx.surfaces.push(s);
        }
    }

    if is_greater_than(el.z_max, 0.0) {
        for v in 0..poly_ext.outer().len() {
            let out = direction_out(&poly_ext, v)?;
            let mut s = Surface::new(
                SurfaceKind::ExteriorWall,
                edge_plane(&poly_ext, v, out),
                el.z_grade,
                el.z_max,
                BoundaryKind::ExteriorFlux,
                orientation(out),
            );
            if let Some(wall) = &f.wall {
                s.emissivity = Some(wall.exterior_emissivity);
                s.absorptivity = Some(wall.exterior_absorptivity);
            }
            ctx.surfaces.push(s);
        }
    }

    // Far-field planes on all four sides, below grade only.
    for (polygon, orientation) in [
        (Polygon::rect(x_min, y_min, x_min, y_max), Orientation::XNeg),
        (Polygon::rect(x_max, y_min, x_max, y_max), Orientation::XPos),
        (Polygon::rect(x_min, y_min, x_max, y_min), Orientation::YNeg),
        (Polygon::rect(x_min, y_max, x_max, y_max), Orientation::YPos),
    ] {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::FarField,
            polygon,
            el.z_min,
            el.z_grade,
            BoundaryKind::ZeroFlux,
            orientation,
        ));
    }

    let deep_ground = Surface::new(
        SurfaceKind::DeepGround,
        domain_rect.clone(),
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
        poly_int.clone(),
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
            punched(&domain_rect, &poly_ext)?,
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
            poly_int.clone(),
            el.z_max,
            el.z_max,
            BoundaryKind::InteriorTemperature,
            Orientation::ZPos,
        ));
    }

    if is_greater_than(el.z_max, 0.0) {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::ExteriorAirTop,
            punched(&domain_rect, &poly_ext)?,
            el.z_max,
            el.z_max,
            BoundaryKind::ExteriorTemperature,
            Orientation::ZPos,
        ));
    }

    if f.wall.is_some() {
        ctx.surfaces.push(Surface::new(
            SurfaceKind::WallTop,
            punched(&poly_ext, &poly_int)?,
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
        polygon: domain_rect.clone(),
        z_min: el.z_min,
        z_max: el.z_max,
    });

    if let Some(ins) = &f.interior_horizontal_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::InteriorHorizontalInsulation,
            material: ins.layer.material,
            polygon: punched(&fp, &offset(&fp, el.xy_int_h_ins)?)?,
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
                polygon: fp.clone(),
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
            polygon: punched(&fp, &poly_int)?,
            z_min: el.z_int_v_ins,
            z_max: el.z_max,
        });
    }

    ctx.blocks.push(Block {
        kind: BlockKind::InteriorAir,
        source: BlockSource::InteriorAir,
        material: Material::air(),
        polygon: poly_int.clone(),
        z_min: el.z_slab,
        z_max: el.z_max,
    });

    if let Some(wall) = &f.wall {
        // Layer rings run from the footprint outward.
        let mut position = 0.0;
        for layer in &wall.layers {
            ctx.blocks.push(Block {
                kind: BlockKind::Solid,
                source: BlockSource::WallLayer,
                material: layer.material,
                polygon: punched(&offset(&fp, position + layer.thickness)?, &offset(&fp, position)?)?,
                z_min: el.z_wall,
                z_max: el.z_max,
            });
            position += layer.thickness;
        }
    }

    let wall_width = f.wall.as_ref().map(|w| w.total_width()).unwrap_or(0.0);

    if let Some(ins) = &f.exterior_vertical_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::ExteriorVerticalInsulation,
            material: ins.layer.material,
            polygon: punched(&poly_ext, &offset(&fp, wall_width)?)?,
            z_min: el.z_ext_v_ins,
            z_max: el.z_max,
        });
    }

    if let Some(ins) = &f.exterior_horizontal_insulation {
        ctx.blocks.push(Block {
            kind: BlockKind::Solid,
            source: BlockSource::ExteriorHorizontalInsulation,
            material: ins.layer.material,
            polygon: punched(&offset(&fp, el.xy_ext_h_ins)?, &offset(&fp, wall_width)?)?,
            z_min: el.z_ext_h_ins,
            z_max: el.z_ext_h_ins + ins.layer.thickness,
        });
    }

    ctx.blocks.push(Block {
        kind: BlockKind::ExteriorAir,
        source: BlockSource::ExteriorAir,
        material: Material::air(),
        polygon: punched(&domain_rect, &poly_ext)?,
        z_min: el.z_grade,
        z_max: el.z_max,
    });

    // Near-field bands: every footprint edge projects a band onto the axis
    // its outward normal points along.
    let mut x_bands = Vec::new();
    let mut y_bands = Vec::new();
    for (v, p) in fp.outer().iter().enumerate() {
        match direction_out(&fp, v)? {
            Direction::XPos => x_bands.push((p.x + el.xy_near_int, p.x + el.xy_near_ext)),
            Direction::XNeg => x_bands.push((p.x - el.xy_near_ext, p.x - el.xy_near_int)),
            Direction::YPos => y_bands.push((p.y + el.xy_near_int, p.y + el.xy_near_ext)),
            Direction::YNeg => y_bands.push((p.y - el.xy_near_ext, p.y - el.xy_near_int)),
        }
    }

    ctx.x_ranges = partition_axis(merge_bands(x_bands), x_min, x_max, "x")?;
    ctx.y_ranges = partition_axis(merge_bands(y_bands), y_min, y_max, "y")?;

    ctx.footprint = Some(fp);
    Ok(())
}

fn orientation(d: Direction) -> Orientation {
    match d {
        Direction::XPos => Orientation::XPos,
        Direction::XNeg => Orientation::XNeg,
        Direction::YPos => Orientation::YPos,
        Direction::YNeg => Orientation::YNeg,
    }
}

/// Degenerate rectangle spanning the edge leaving vertex `v`, lying in the
/// vertical plane the edge belongs to.
fn edge_plane(polygon: &Polygon, v: usize, out: Direction) -> Polygon {
    match out {
        Direction::XPos | Direction::XNeg => {
            let x = edge_x_min(polygon, v);
            Polygon::rect(x, edge_y_min(polygon, v), x, edge_y_max(polygon, v))
        }
        Direction::YPos | Direction::YNeg => {
            let y = edge_y_min(polygon, v);
            Polygon::rect(edge_x_min(polygon, v), y, edge_x_max(polygon, v), y)
        }
    }
}

/// A copy of `outer` with `hole`'s outer ring punched out of it.
fn punched(outer: &Polygon, hole: &Polygon) -> Result<Polygon> {
    let mut poly = outer.clone();
    poly.add_hole(hole.outer().to_vec())?;
    Ok(poly)
}

/// Merges overlapping or touching bands into disjoint sorted bands.
fn merge_bands(mut bands: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    bands.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for band in bands {
        match merged.last_mut() {
            Some(last) if is_less_or_equal(band.0, last.1) => last.1 = last.1.max(band.1),
            _ => merged.push(band),
        }
    }
    merged
}

/// Builds the axis partition from the merged near-field bands: exterior
/// zones outside the outermost bands, interior zones between them.
fn partition_axis(
    bands: Vec<(f64, f64)>,
    axis_min: f64,
    axis_max: f64,
    axis: &str,
) -> Result<Ranges> {
    ensure!(!bands.is_empty(), "{axis} axis has no near-field bands");
    let first = bands[0];
    let last = bands[bands.len() - 1];
    ensure!(
        is_greater_than(first.0, axis_min) && is_less_than(last.1, axis_max),
        "near-field band [{}, {}] reaches the {axis} domain edge [{}, {}]; \
         increase the far-field width",
        first.0,
        last.1,
        axis_min,
        axis_max
    );

    let mut ranges = vec![Range::new(axis_min, first.0, ZoneKind::MinExterior)];
    for (i, band) in bands.iter().enumerate() {
        if i > 0 {
            ranges.push(Range::new(bands[i - 1].1, band.0, ZoneKind::Interior));
        }
        ranges.push(Range::new(band.0, band.1, ZoneKind::Near));
    }
    ranges.push(Range::new(last.1, axis_max, ZoneKind::MaxExterior));
    Ok(Ranges { ranges })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_bands_overlapping() {
        let merged = merge_bands(vec![(2.0, 3.0), (0.0, 1.0), (0.5, 1.5)]);
        assert_eq!(merged, vec![(0.0, 1.5), (2.0, 3.0)]);
    }

    #[test]
    fn test_merge_bands_touching() {
        let merged = merge_bands(vec![(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(merged, vec![(0.0, 2.0)]);
    }

    #[test]
    fn test_partition_square_footprint() {
        // Two bands, as produced by opposite walls of a square footprint.
        let ranges = partition_axis(vec![(3.8, 4.4), (9.6, 10.2)], 0.0, 14.0, "x").unwrap();
        let kinds: Vec<ZoneKind> = ranges.ranges.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ZoneKind::MinExterior,
                ZoneKind::Near,
                ZoneKind::Interior,
                ZoneKind::Near,
                ZoneKind::MaxExterior,
            ]
        );
        // Contiguous cover of the axis.
        for w in ranges.ranges.windows(2) {
            assert_eq!(w[0].max, w[1].min);
        }
        assert_eq!(ranges.ranges[0].min, 0.0);
        assert_eq!(ranges.ranges.last().unwrap().max, 14.0);
    }

    #[test]
    fn test_partition_band_at_domain_edge_fails() {
        assert!(partition_axis(vec![(0.0, 1.0)], 0.0, 5.0, "x").is_err());
    }
}

//! # Inline Valves and Meters
//!
//! Parts that sit in a straight pipe run. All of them run along local Z
//! with sockets on both ends and a full-length bore.

use crate::compose::BooleanOp;
use crate::dims::FittingGeometry;
use crate::parts::{check_positive, cylinder_between, finish_fitting, shifted, start, BuildContext};
use crate::placement::Placement;
use crate::scene::{PartKind, Solid};
use config::constants::CUTTER_LENGTH_FACTOR;
use glam::DVec3;
use rdwc_mesh::primitives::{create_cube, create_sphere};
use rdwc_mesh::{Mesh, MeshResult};

/// Core tube, both end sleeves and the bore: the parts every inline body shares.
struct Inline {
    core: Mesh,
    sleeves: Mesh,
    bore: Mesh,
}

fn inline(name: &str, g: &FittingGeometry, segments: u32) -> MeshResult<Inline> {
    check_positive(name, "pipe radius", g.pipe_radius)?;
    check_positive(name, "inner radius", g.inner_radius)?;
    let (r, ri, sor) = (g.pipe_radius, g.inner_radius, g.socket_outer_radius);
    let reach = g.arm_length + g.socket_length / 2.0;
    let mouth = g.connection_offset();
    let bore = CUTTER_LENGTH_FACTOR / 2.0 * mouth;

    let mut sleeves = Mesh::new();
    for axis in [DVec3::NEG_Z, DVec3::Z] {
        sleeves.merge(&cylinder_between(axis * g.arm_length, axis * mouth, sor, sor, segments)?);
    }
    Ok(Inline {
        core: cylinder_between(DVec3::NEG_Z * reach, DVec3::Z * reach, r, r, segments)?,
        sleeves,
        bore: cylinder_between(DVec3::NEG_Z * bore, DVec3::Z * bore, ri, ri, segments)?,
    })
}

/// Ball valve: spherical body, handle stem on +Y and a lever block.
pub fn ball_valve(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    let seg = ctx.resolution.fitting_segments;
    let parts = inline(name, g, seg)?;
    let r = g.pipe_radius;
    let mut solid = start(name, parts.core, PartKind::BallValve);

    let mut body = create_sphere(1.5 * r, seg)?;
    body.merge(&parts.sleeves);
    ctx.compose_mesh(&mut solid, body, BooleanOp::Union);

    let stem = cylinder_between(DVec3::Y * 1.2 * r, DVec3::Y * 2.2 * r, 0.4 * r, 0.4 * r, seg)?;
    ctx.compose_mesh(&mut solid, stem, BooleanOp::Union);
    let lever = create_cube(DVec3::new(0.6 * r, 0.4 * r, 2.0 * r), true)?;
    ctx.compose_mesh(
        &mut solid,
        shifted(lever, DVec3::new(0.0, 2.35 * r, 0.5 * r)),
        BooleanOp::Union,
    );

    ctx.compose_mesh(&mut solid, parts.bore, BooleanOp::Difference);
    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// Check valve: wide body with conical transitions into the sockets.
pub fn check_valve(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    let seg = ctx.resolution.fitting_segments;
    let parts = inline(name, g, seg)?;
    let (r, l) = (g.pipe_radius, g.arm_length);
    let taper_end = l + 0.1 * g.socket_length;
    let mut solid = start(name, parts.core, PartKind::CheckValve);

    let body = cylinder_between(DVec3::NEG_Z * 0.5 * l, DVec3::Z * 0.5 * l, 1.5 * r, 1.5 * r, seg)?;
    ctx.compose_mesh(&mut solid, body, BooleanOp::Union);

    let mut tapers = Mesh::new();
    for axis in [DVec3::NEG_Z, DVec3::Z] {
        tapers.merge(&cylinder_between(axis * 0.45 * l, axis * taper_end, 1.45 * r, r, seg)?);
    }
    ctx.compose_mesh(&mut solid, tapers, BooleanOp::Union);
    ctx.compose_mesh(&mut solid, parts.sleeves, BooleanOp::Union);

    ctx.compose_mesh(&mut solid, parts.bore, BooleanOp::Difference);
    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// Flow meter: square body with a sight window recessed into its +X face.
pub fn flow_meter(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    let seg = ctx.resolution.fitting_segments;
    let parts = inline(name, g, seg)?;
    let (r, l) = (g.pipe_radius, g.arm_length);
    let mut solid = start(name, parts.core, PartKind::FlowMeter);

    let mut body = create_cube(DVec3::new(2.2 * r, 2.2 * r, 1.6 * l), true)?;
    body.merge(&parts.sleeves);
    ctx.compose_mesh(&mut solid, body, BooleanOp::Union);

    let window = create_cube(DVec3::new(0.6 * r, 1.2 * r, l), true)?;
    ctx.compose_mesh(
        &mut solid,
        shifted(window, DVec3::X * 1.1 * r),
        BooleanOp::Difference,
    );

    ctx.compose_mesh(&mut solid, parts.bore, BooleanOp::Difference);
    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// TESTS
// =============================================================================

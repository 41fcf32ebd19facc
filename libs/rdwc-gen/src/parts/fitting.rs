//! # Fittings
//!
//! Molded fittings that join pipes: tees, elbows, unions, bulkheads, end
//! caps, the ring manifold and drip emitters.
//!
//! Every fitting follows the same recipe:
//!
//! 1. Union the solid core (arms or body).
//! 2. Union a socket sleeve at each port, ending exactly on the mouth.
//! 3. Subtract the bore, extended past every mouth.
//!
//! Socket sleeves of one fitting never touch each other, so they are merged
//! into a single mesh and unioned in one step.

use std::f64::consts::{SQRT_2, TAU};

use crate::compose::BooleanOp;
use crate::dims::FittingGeometry;
use crate::parts::{check_positive, cylinder_between, finish_fitting, shifted, start, BuildContext};
use crate::placement::{Placement, Port};
use crate::scene::{PartKind, Solid};
use config::constants::CUTTER_LENGTH_FACTOR;
use glam::DVec3;
use rdwc_mesh::primitives::{create_cube, create_cylinder, create_sphere, create_torus};
use rdwc_mesh::{Mesh, MeshResult};

// =============================================================================
// HELPERS
// =============================================================================

/// Socket sleeve on `axis`, from the arm end to the mouth.
fn socket(g: &FittingGeometry, axis: DVec3, segments: u32) -> MeshResult<Mesh> {
    let mouth = g.connection_offset();
    cylinder_between(
        axis * g.arm_length,
        axis * mouth,
        g.socket_outer_radius,
        g.socket_outer_radius,
        segments,
    )
}

/// Sleeves on every axis, merged into one mesh.
fn sockets(g: &FittingGeometry, axes: &[DVec3], segments: u32) -> MeshResult<Mesh> {
    let mut merged = Mesh::new();
    for axis in axes {
        merged.merge(&socket(g, *axis, segments)?);
    }
    Ok(merged)
}

/// Half length of a bore that clears every mouth.
fn bore_reach(g: &FittingGeometry) -> f64 {
    CUTTER_LENGTH_FACTOR / 2.0 * g.connection_offset()
}

fn validate(name: &str, g: &FittingGeometry) -> MeshResult<()> {
    check_positive(name, "pipe radius", g.pipe_radius)?;
    check_positive(name, "inner radius", g.inner_radius)?;
    check_positive(name, "socket length", g.socket_length)?;
    check_positive(name, "arm length", g.arm_length)
}

// =============================================================================
// TEE & ELBOW
// =============================================================================

/// Equal tee: run along local X, branch on +Y.
///
/// # Example
///
/// ```rust
/// use rdwc_gen::compose::Compositor;
/// use rdwc_gen::dims::{FittingGeometry, FittingKind, PipeSpec};
/// use rdwc_gen::parts::{tee, BuildContext};
/// use rdwc_gen::placement::Placement;
/// use rdwc_gen::settings::Resolution;
///
/// let compositor = Compositor::default();
/// let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
/// let pipe = PipeSpec::from_diameter(0.025).unwrap();
/// let g = FittingGeometry::for_kind(FittingKind::Tee, &pipe);
/// let fitting = tee(&mut ctx, "Tee_Inlet_0", &Placement::default(), &g).unwrap();
/// assert!(fitting.mesh.signed_volume() > 0.0);
/// ```
pub fn tee(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let (r, ri) = (g.pipe_radius, g.inner_radius);
    let reach = g.arm_length + g.socket_length / 2.0;
    let bore = bore_reach(g);

    let run = cylinder_between(DVec3::NEG_X * reach, DVec3::X * reach, r, r, seg)?;
    let mut solid = start(name, run, PartKind::Tee);

    let branch = cylinder_between(DVec3::ZERO, DVec3::Y * reach, r, r, seg)?;
    ctx.compose_mesh(&mut solid, branch, BooleanOp::Union);
    let sleeves = sockets(g, &[DVec3::X, DVec3::NEG_X, DVec3::Y], seg)?;
    ctx.compose_mesh(&mut solid, sleeves, BooleanOp::Union);

    let run_bore = cylinder_between(DVec3::NEG_X * bore, DVec3::X * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, run_bore, BooleanOp::Difference);
    let branch_bore = cylinder_between(DVec3::ZERO, DVec3::Y * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, branch_bore, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// 90° elbow from local +X to +Y.
pub fn elbow(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let (r, ri) = (g.pipe_radius, g.inner_radius);
    let reach = g.arm_length + g.socket_length / 2.0;
    let bore = bore_reach(g);

    // Both arms reach back past the corner so the outside of the bend is filled
    let x_arm = cylinder_between(DVec3::NEG_X * r, DVec3::X * reach, r, r, seg)?;
    let mut solid = start(name, x_arm, PartKind::Elbow);
    let y_arm = cylinder_between(DVec3::NEG_Y * r, DVec3::Y * reach, r, r, seg)?;
    ctx.compose_mesh(&mut solid, y_arm, BooleanOp::Union);
    let sleeves = sockets(g, &[DVec3::X, DVec3::Y], seg)?;
    ctx.compose_mesh(&mut solid, sleeves, BooleanOp::Union);

    let x_bore = cylinder_between(DVec3::NEG_X * ri, DVec3::X * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, x_bore, BooleanOp::Difference);
    let y_bore = cylinder_between(DVec3::NEG_Y * ri, DVec3::Y * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, y_bore, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// INLINE FITTINGS
// =============================================================================

/// Straight union along local Z with a hexagonal nut in the middle.
pub fn union_fitting(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let (r, ri) = (g.pipe_radius, g.inner_radius);
    let reach = g.arm_length + g.socket_length / 2.0;
    let bore = bore_reach(g);

    let body = cylinder_between(DVec3::NEG_Z * reach, DVec3::Z * reach, r, r, seg)?;
    let mut solid = start(name, body, PartKind::Union);

    let nut_radius = g.socket_outer_radius * 1.25;
    let mut extras = create_cylinder(0.8 * g.arm_length, nut_radius, nut_radius, true, 6)?;
    extras.merge(&sockets(g, &[DVec3::NEG_Z, DVec3::Z], seg)?);
    ctx.compose_mesh(&mut solid, extras, BooleanOp::Union);

    let channel = cylinder_between(DVec3::NEG_Z * bore, DVec3::Z * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, channel, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// Tank-wall bulkhead along local Z: flange, threaded body, nut ring and
/// sockets on both sides.
pub fn bulkhead(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let detail = ctx.resolution.detail_segments;
    let (r, ri, l) = (g.pipe_radius, g.inner_radius, g.arm_length);
    let reach = l + g.socket_length / 2.0;
    let bore = bore_reach(g);

    let thread = cylinder_between(DVec3::NEG_Z * reach, DVec3::Z * reach, 1.1 * r, 1.1 * r, seg)?;
    let mut solid = start(name, thread, PartKind::Bulkhead);

    let mut extras = create_cylinder(0.3 * l, 2.0 * r, 2.0 * r, true, seg)?;
    let nut = create_torus(1.25 * r, 0.25 * r, seg, detail)?;
    extras.merge(&shifted(nut, DVec3::Z * 0.55 * l));
    extras.merge(&sockets(g, &[DVec3::NEG_Z, DVec3::Z], seg)?);
    ctx.compose_mesh(&mut solid, extras, BooleanOp::Union);

    let channel = cylinder_between(DVec3::NEG_Z * bore, DVec3::Z * bore, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, channel, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// End cap with its socket on local −Z and a domed closed end.
pub fn end_cap(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let (sor, ri) = (g.socket_outer_radius, g.inner_radius);
    let mouth = g.connection_offset();

    let body = cylinder_between(DVec3::NEG_Z * mouth, DVec3::ZERO, sor, sor, seg)?;
    let mut solid = start(name, body, PartKind::EndCap);
    let dome = create_sphere(sor, seg)?;
    ctx.compose_mesh(&mut solid, dome, BooleanOp::Union);

    // Only the socket side is open
    let cavity = cylinder_between(
        DVec3::NEG_Z * (mouth + g.socket_length),
        DVec3::NEG_Z * (0.5 * g.arm_length),
        ri,
        ri,
        seg,
    )?;
    ctx.compose_mesh(&mut solid, cavity, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

/// Drip emitter: barb socket on local +Z, body and a nozzle cone below.
pub fn drip_emitter(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    g: &FittingGeometry,
) -> MeshResult<Solid> {
    validate(name, g)?;
    let seg = ctx.resolution.fitting_segments;
    let (r, ri, l) = (g.pipe_radius, g.inner_radius, g.arm_length);
    let reach = l + g.socket_length / 2.0;

    let body = cylinder_between(DVec3::NEG_Z * 0.5 * l, DVec3::Z * reach, 1.1 * r, 1.1 * r, seg)?;
    let mut solid = start(name, body, PartKind::DripEmitter);

    let mut extras = cylinder_between(DVec3::NEG_Z * 0.4 * l, DVec3::NEG_Z * 1.2 * l, 1.05 * r, 0.3 * r, seg)?;
    extras.merge(&socket(g, DVec3::Z, seg)?);
    ctx.compose_mesh(&mut solid, extras, BooleanOp::Union);

    let feed = cylinder_between(DVec3::NEG_Z * 0.3 * l, DVec3::Z * bore_reach(g), ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, feed, BooleanOp::Difference);
    let nozzle = cylinder_between(DVec3::NEG_Z * 1.5 * l, DVec3::NEG_Z * 0.2 * l, 0.12 * r, 0.12 * r, seg)?;
    ctx.compose_mesh(&mut solid, nozzle, BooleanOp::Difference);

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// RING MANIFOLD
// =============================================================================

/// Proportions of a ring manifold block with `outlets` radial outlets in
/// the local XY plane and two end ports on ±Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifoldLayout {
    pub outlets: u32,
    pub half_width: f64,
    pub half_height: f64,
    pub geometry: FittingGeometry,
}

impl ManifoldLayout {
    /// Sizes the block so the outlet sockets clear each other.
    pub fn new(geometry: &FittingGeometry, outlets: u32) -> Self {
        let sor = geometry.socket_outer_radius;
        let half_width = (2.0 * sor).max(sor * outlets as f64 / std::f64::consts::PI * 1.1);
        Self {
            outlets,
            half_width,
            half_height: half_width,
            geometry: *geometry,
        }
    }

    /// Unit direction of outlet `index`, at angle `index · 2π / outlets`.
    pub fn outlet_direction(&self, index: u32) -> DVec3 {
        let angle = index as f64 * TAU / self.outlets.max(1) as f64;
        DVec3::new(angle.cos(), angle.sin(), 0.0)
    }

    /// Distance from the center to every outlet mouth.
    pub fn outlet_mouth_radius(&self) -> f64 {
        self.half_width * SQRT_2 + self.geometry.connection_offset()
    }

    /// Distance from the center to both end-port mouths.
    pub fn end_mouth_offset(&self) -> f64 {
        self.half_height + self.geometry.socket_length
    }

    /// World ports: every outlet in order, then −Z, then +Z.
    pub fn ports(&self, placement: &Placement) -> Vec<Port> {
        let mut ports: Vec<Port> = (0..self.outlets)
            .map(|i| {
                let dir = self.outlet_direction(i);
                Port::new(
                    placement.transform_point(dir * self.outlet_mouth_radius()),
                    placement.transform_vector(dir),
                )
            })
            .collect();
        for axis in [DVec3::NEG_Z, DVec3::Z] {
            ports.push(Port::new(
                placement.transform_point(axis * self.end_mouth_offset()),
                placement.transform_vector(axis),
            ));
        }
        ports
    }
}

/// Rectangular manifold block with a central channel along Z.
pub fn manifold_block(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    layout: &ManifoldLayout,
) -> MeshResult<Solid> {
    let g = &layout.geometry;
    validate(name, g)?;
    if layout.outlets == 0 {
        return Err(rdwc_mesh::MeshError::degenerate(format!(
            "{name} needs at least one outlet"
        )));
    }
    let seg = ctx.resolution.fitting_segments;
    let (r, ri, sor) = (g.pipe_radius, g.inner_radius, g.socket_outer_radius);
    let (hw, hh) = (layout.half_width, layout.half_height);
    let mouth = layout.outlet_mouth_radius();
    let socket_start = mouth - g.socket_length;

    let block = create_cube(DVec3::new(2.0 * hw, 2.0 * hw, 2.0 * hh), true)?;
    let mut solid = start(name, block, PartKind::ManifoldBlock);

    let mut arms = Mesh::new();
    let mut sleeves = Mesh::new();
    for i in 0..layout.outlets {
        let dir = layout.outlet_direction(i);
        let arm_end = socket_start + g.socket_length / 2.0;
        arms.merge(&cylinder_between(dir * 0.9 * hw, dir * arm_end, r, r, seg)?);
        sleeves.merge(&cylinder_between(dir * socket_start, dir * mouth, sor, sor, seg)?);
    }
    let end = layout.end_mouth_offset();
    for axis in [DVec3::NEG_Z, DVec3::Z] {
        let inner = hh - 0.5 * g.socket_length;
        sleeves.merge(&cylinder_between(axis * inner, axis * end, sor, sor, seg)?);
    }
    ctx.compose_mesh(&mut solid, arms, BooleanOp::Union);
    ctx.compose_mesh(&mut solid, sleeves, BooleanOp::Union);

    let reach = CUTTER_LENGTH_FACTOR / 2.0 * end;
    let channel = cylinder_between(DVec3::NEG_Z * reach, DVec3::Z * reach, ri, ri, seg)?;
    ctx.compose_mesh(&mut solid, channel, BooleanOp::Difference);
    for i in 0..layout.outlets {
        let dir = layout.outlet_direction(i);
        let hole = cylinder_between(DVec3::ZERO, dir * (mouth + g.socket_length), ri, ri, seg)?;
        ctx.compose_mesh(&mut solid, hole, BooleanOp::Difference);
    }

    finish_fitting(&mut solid, g.wall_thickness);
    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// TESTS
// =============================================================================

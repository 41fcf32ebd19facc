//! # Accessories
//!
//! Pumps, aeration, sensors and lighting. These are not plumbed by pipes;
//! their sizes are fixed or scale with the vessel they serve.

use std::f64::consts::PI;

use crate::compose::BooleanOp;
use crate::parts::{check_positive, cylinder_between, shifted, start, BuildContext};
use crate::placement::Placement;
use crate::scene::{Emission, PartKind, Shading, Solid};
use crate::settings::AirStoneType;
use config::constants::{LED_EMISSION_COLOR, LED_EMISSION_STRENGTH};
use glam::{DMat4, DVec3};
use rdwc_mesh::primitives::{create_cube, create_cylinder, create_sphere, create_torus};
use rdwc_mesh::{Mesh, MeshResult};

// =============================================================================
// PUMPS
// =============================================================================

/// Submersible pump standing on its base (local z = 0), outlet on top.
pub fn pump(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    radius: f64,
    height: f64,
) -> MeshResult<Solid> {
    check_positive(name, "radius", radius)?;
    check_positive(name, "height", height)?;
    let seg = ctx.resolution.fitting_segments;

    let body = create_cylinder(height, radius, radius, false, seg)?;
    let mut solid = start(name, body, PartKind::Pump);

    // Eight intake slots around the lower quarter
    let slot = create_cube(DVec3::new(2.4 * radius, 0.15 * radius, 0.3 * height), true)?;
    for k in 0..4 {
        let turn = DMat4::from_translation(DVec3::Z * 0.25 * height)
            * DMat4::from_rotation_z(k as f64 * PI / 4.0);
        ctx.compose_mesh(&mut solid, slot.transformed(&turn), BooleanOp::Difference);
    }

    let nozzle = cylinder_between(
        DVec3::Z * 0.9 * height,
        DVec3::Z * (height + 0.4 * radius),
        0.3 * radius,
        0.3 * radius,
        seg,
    )?;
    ctx.compose_mesh(&mut solid, nozzle, BooleanOp::Union);

    solid.transform = placement.matrix();
    Ok(solid)
}

/// Air pump box on four feet with `outlets` nozzles along its +Y face.
pub fn air_pump(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    outlets: u32,
) -> MeshResult<Solid> {
    const SIZE: DVec3 = DVec3::new(0.2, 0.12, 0.08);
    const FOOT_RADIUS: f64 = 0.008;
    const NOZZLE_RADIUS: f64 = 0.004;
    let detail = ctx.resolution.detail_segments;

    let body = create_cube(SIZE, true)?;
    let mut solid = start(name, body, PartKind::AirPump);

    let mut extras = Mesh::new();
    let half = SIZE / 2.0;
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let at = DVec3::new(sx * (half.x - 0.02), sy * (half.y - 0.02), -half.z);
        extras.merge(&cylinder_between(
            at + DVec3::Z * 0.005,
            at - DVec3::Z * 0.01,
            FOOT_RADIUS,
            FOOT_RADIUS,
            detail,
        )?);
    }
    let spacing = SIZE.x / (outlets.max(1) + 1) as f64;
    for i in 0..outlets {
        let x = -half.x + spacing * (i + 1) as f64;
        let at = DVec3::new(x, half.y, 0.0);
        extras.merge(&cylinder_between(
            at - DVec3::Y * 0.005,
            at + DVec3::Y * 0.02,
            NOZZLE_RADIUS,
            NOZZLE_RADIUS,
            detail,
        )?);
    }
    ctx.compose_mesh(&mut solid, extras, BooleanOp::Union);

    solid.transform = placement.matrix();
    Ok(solid)
}

/// Air stone of the given shape, centered on its placement.
pub fn air_stone(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    shape: AirStoneType,
) -> MeshResult<Solid> {
    let detail = ctx.resolution.detail_segments;
    let mesh = match shape {
        AirStoneType::Cylinder => create_cylinder(0.05, 0.015, 0.015, true, detail)?,
        AirStoneType::Disk => create_cylinder(0.015, 0.05, 0.05, true, detail)?,
        AirStoneType::Ball => create_sphere(0.025, detail)?,
        AirStoneType::Bar => create_cube(DVec3::new(0.1, 0.02, 0.02), true)?,
    };
    let mut solid = Solid::placed(name, mesh, PartKind::AirStone, placement);
    solid.shading = Shading::Smooth;
    Ok(solid)
}

// =============================================================================
// SENSORS
// =============================================================================

/// Float level switch: vertical stem, torus float and a wall mount on top.
pub fn level_sensor(ctx: &mut BuildContext, name: &str, placement: &Placement) -> MeshResult<Solid> {
    let detail = ctx.resolution.detail_segments;

    let stem = create_cylinder(0.2, 0.005, 0.005, true, detail)?;
    let mut solid = start(name, stem, PartKind::LevelSensor);

    let mut extras = shifted(create_torus(0.02, 0.008, detail, detail)?, DVec3::Z * -0.05);
    extras.merge(&shifted(
        create_cube(DVec3::new(0.04, 0.02, 0.02), true)?,
        DVec3::Z * 0.1,
    ));
    ctx.compose_mesh(&mut solid, extras, BooleanOp::Union);

    solid.transform = placement.matrix();
    Ok(solid)
}

/// Rim-mounted block with `probes` vertical holes and a clip hanging
/// over the outside of the wall (local −Y).
pub fn probe_holder(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    probes: u32,
) -> MeshResult<Solid> {
    const HOLE_RADIUS: f64 = 0.006;
    const PITCH: f64 = 0.025;
    if probes == 0 {
        return Err(rdwc_mesh::MeshError::degenerate(format!(
            "{name} needs at least one probe slot"
        )));
    }
    let detail = ctx.resolution.detail_segments;
    let width = PITCH * probes as f64 + 0.02;

    let block = create_cube(DVec3::new(width, 0.05, 0.025), true)?;
    let mut solid = start(name, block, PartKind::ProbeHolder);

    let clip = create_cube(DVec3::new(0.02, 0.008, 0.06), true)?;
    ctx.compose_mesh(
        &mut solid,
        shifted(clip, DVec3::new(0.0, -0.028, -0.025)),
        BooleanOp::Union,
    );

    let mut holes = Mesh::new();
    for i in 0..probes {
        let x = -width / 2.0 + 0.01 + PITCH * (i as f64 + 0.5);
        holes.merge(&cylinder_between(
            DVec3::new(x, 0.005, -0.03),
            DVec3::new(x, 0.005, 0.03),
            HOLE_RADIUS,
            HOLE_RADIUS,
            detail,
        )?);
    }
    ctx.compose_mesh(&mut solid, holes, BooleanOp::Difference);

    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// LIGHTING
// =============================================================================

/// Emissive LED panel with four hanger rods rising from its corners.
pub fn light_panel(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    width: f64,
    depth: f64,
) -> MeshResult<Solid> {
    const THICKNESS: f64 = 0.02;
    const HANGER_LENGTH: f64 = 0.2;
    check_positive(name, "width", width)?;
    check_positive(name, "depth", depth)?;
    let detail = ctx.resolution.detail_segments;

    let panel = create_cube(DVec3::new(width, depth, THICKNESS), true)?;
    let mut solid = start(name, panel, PartKind::LightPanel);

    let inset = 0.05_f64.min(width / 4.0).min(depth / 4.0);
    let rod = (0.004_f64).min(inset / 2.0);
    let mut hangers = Mesh::new();
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let at = DVec3::new(sx * (width / 2.0 - inset), sy * (depth / 2.0 - inset), 0.0);
        hangers.merge(&cylinder_between(
            at,
            at + DVec3::Z * HANGER_LENGTH,
            rod,
            rod,
            detail,
        )?);
    }
    ctx.compose_mesh(&mut solid, hangers, BooleanOp::Union);

    solid.emission = Some(Emission {
        color: LED_EMISSION_COLOR,
        strength: LED_EMISSION_STRENGTH,
    });
    solid.transform = placement.matrix();
    Ok(solid)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Compositor;
    use crate::settings::Resolution;
    use approx::assert_relative_eq;

    #[test]
    fn test_pump_stands_on_floor() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let solid = pump(&mut ctx, "Main_Pump", &Placement::default(), 0.06, 0.1).unwrap();
        assert!(ctx.diagnostics().is_empty());
        let (min, max) = solid.mesh.bounding_box();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(max.z, 0.1 + 0.4 * 0.06, epsilon = 1e-12);
        // Slots remove material from the plain cylinder
        assert!(solid.mesh.signed_volume() < PI * 0.06 * 0.06 * 0.1);
    }

    #[test]
    fn test_air_stone_shapes() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let placement = Placement::at(DVec3::new(0.0, 0.0, 0.05));
        for shape in [
            AirStoneType::Cylinder,
            AirStoneType::Disk,
            AirStoneType::Ball,
            AirStoneType::Bar,
        ] {
            let stone = air_stone(&mut ctx, "Air_Stone", &placement, shape).unwrap();
            assert!(stone.mesh.is_closed());
            assert!(stone.location().abs_diff_eq(DVec3::new(0.0, 0.0, 0.05), 1e-12));
        }
    }

    #[test]
    fn test_light_panel_is_emissive() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let panel = light_panel(&mut ctx, "LED_Panel_0", &Placement::default(), 0.6, 0.6).unwrap();
        assert!(panel.emission.is_some());
        let (min, max) = panel.mesh.bounding_box();
        assert_relative_eq!(max.x - min.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(max.z, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_probe_holder_needs_slots() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        assert!(probe_holder(&mut ctx, "Probe_Holder", &Placement::default(), 0).is_err());
        let holder = probe_holder(&mut ctx, "Probe_Holder", &Placement::default(), 3).unwrap();
        assert!(holder.mesh.signed_volume() < 0.095 * 0.05 * 0.025 + 0.02 * 0.008 * 0.06);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_air_pump_and_sensor_build() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let air = air_pump(&mut ctx, "Air_Pump", &Placement::default(), 4).unwrap();
        let sensor = level_sensor(&mut ctx, "Water_Level_High", &Placement::default()).unwrap();
        assert!(air.mesh.signed_volume() > 0.2 * 0.12 * 0.08);
        assert!(sensor.mesh.signed_volume() > 0.0);
        assert!(ctx.diagnostics().is_empty());
    }
}

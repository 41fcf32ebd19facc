//! # Vessels
//!
//! Pots, the reservoir and the balance tank share one lathe profile: a
//! closed bottom, a wall of constant thickness and a rim that flares out
//! and hangs down. The origin is the center of the cylinder.
//!
//! ```text
//!       rf-t rf
//!   r-t r |  |
//!    ┌────────┐ z1
//!    │  ┌──┐  │
//!    │  │  └──┘ z1-drop
//!    │  │
//!    │  └───── z0+t
//!    └──────── z0
//! ```

use crate::compose::BooleanOp;
use crate::dims::{CylinderDims, VesselClass};
use crate::parts::{check_positive, cylinder_between, BuildContext};
use crate::placement::Placement;
use crate::scene::{PartKind, Solid};
use config::constants::{MAX_APERTURE_RATIO, RIM_DROP, RIM_FLARE_SCALE};
use glam::{DVec2, DVec3};
use log::debug;
use rdwc_mesh::primitives::create_revolved;
use rdwc_mesh::MeshResult;

/// A lid sitting on the rim with a round aperture in its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lid {
    /// Requested aperture radius. Clamped to leave a ring of lid material.
    pub aperture_radius: f64,
}

/// Builds a hollow vessel of the given class.
///
/// # Example
///
/// ```rust
/// use rdwc_gen::compose::Compositor;
/// use rdwc_gen::dims::{vessel_dims, VesselClass, VolumeSpec};
/// use rdwc_gen::parts::{vessel, BuildContext};
/// use rdwc_gen::placement::Placement;
/// use rdwc_gen::settings::Resolution;
///
/// let compositor = Compositor::default();
/// let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
/// let dims = vessel_dims(VesselClass::Pot, VolumeSpec::from_liters(25.0).unwrap());
/// let pot = vessel(&mut ctx, "Pot_0_0", &Placement::default(), VesselClass::Pot, &dims, None).unwrap();
/// assert!(pot.mesh.signed_volume() > 0.0);
/// ```
pub fn vessel(
    ctx: &mut BuildContext,
    name: &str,
    placement: &Placement,
    class: VesselClass,
    dims: &CylinderDims,
    lid: Option<Lid>,
) -> MeshResult<Solid> {
    check_positive(name, "radius", dims.radius)?;
    check_positive(name, "height", dims.height)?;

    let r = dims.radius;
    let t = class.wall_thickness().min(r / 4.0);
    let z0 = -dims.height / 2.0;
    let z1 = dims.height / 2.0;
    let flare = (r * RIM_FLARE_SCALE).max(r + 2.0 * t);
    let drop = RIM_DROP.min(dims.height / 4.0).max(2.0 * t);

    let profile = [
        DVec2::new(0.0, z0),
        DVec2::new(r, z0),
        DVec2::new(r, z1 - t),
        DVec2::new(flare - t, z1 - t),
        DVec2::new(flare - t, z1 - drop),
        DVec2::new(flare, z1 - drop),
        DVec2::new(flare, z1),
        DVec2::new(r - t, z1),
        DVec2::new(r - t, z0 + t),
        DVec2::new(0.0, z0 + t),
    ];
    let mesh = create_revolved(&profile, ctx.resolution.vessel_segments)?;
    let kind = match class {
        VesselClass::Pot => PartKind::Pot,
        VesselClass::Reservoir => PartKind::Reservoir,
        VesselClass::BalanceTank => PartKind::BalanceTank,
    };
    let mut solid = Solid::new(name, mesh, kind);

    if let Some(lid) = lid {
        add_lid(ctx, &mut solid, lid, r, t, flare, z1)?;
    }

    solid.transform = placement.matrix();
    Ok(solid)
}

fn add_lid(
    ctx: &mut BuildContext,
    solid: &mut Solid,
    lid: Lid,
    r: f64,
    t: f64,
    flare: f64,
    z1: f64,
) -> MeshResult<()> {
    let segments = ctx.resolution.vessel_segments;
    let plate = cylinder_between(
        DVec3::new(0.0, 0.0, z1 - 0.5 * t),
        DVec3::new(0.0, 0.0, z1 + t),
        flare - 0.5 * t,
        flare - 0.5 * t,
        segments,
    )?;
    ctx.compose_mesh(solid, plate, BooleanOp::Union);

    let max_aperture = MAX_APERTURE_RATIO * (r - t);
    let aperture = lid.aperture_radius.min(max_aperture);
    if aperture < lid.aperture_radius {
        debug!(
            "{}: aperture {:.4} clamped to {:.4}",
            solid.name, lid.aperture_radius, aperture
        );
    }
    if aperture > 0.0 {
        let hole = cylinder_between(
            DVec3::new(0.0, 0.0, z1 - 3.0 * t),
            DVec3::new(0.0, 0.0, z1 + 3.0 * t),
            aperture,
            aperture,
            segments,
        )?;
        ctx.compose_mesh(solid, hole, BooleanOp::Difference);
    }
    Ok(())
}

/// Point on the outer wall facing `direction` (horizontal, unit) at height `z`
/// above the vessel's floor, in world coordinates.
pub fn wall_point(center: DVec3, dims: &CylinderDims, direction: DVec3, z: f64) -> DVec3 {
    let floor = center.z - dims.height / 2.0;
    DVec3::new(
        center.x + direction.x * dims.radius,
        center.y + direction.y * dims.radius,
        floor + z,
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Compositor;
    use crate::dims::{vessel_dims, VolumeSpec};
    use crate::settings::Resolution;

    fn dims(class: VesselClass, liters: f64) -> CylinderDims {
        vessel_dims(class, VolumeSpec::from_liters(liters).unwrap())
    }

    #[test]
    fn test_pot_is_closed_and_outward() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let d = dims(VesselClass::Pot, 25.0);
        let pot = vessel(&mut ctx, "Pot", &Placement::default(), VesselClass::Pot, &d, None).unwrap();

        assert!(pot.mesh.is_closed());
        let volume = pot.mesh.signed_volume();
        assert!(volume > 0.0);
        // A shell holds far less material than the vessel's capacity
        assert!(volume < d.volume() * 0.2);

        let (min, max) = pot.mesh.bounding_box();
        assert!((max.z - min.z - d.height).abs() < 1e-9);
        assert!(max.x > d.radius);
    }

    #[test]
    fn test_lid_adds_material() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let d = dims(VesselClass::Reservoir, 100.0);
        let open = vessel(&mut ctx, "Open", &Placement::default(), VesselClass::Reservoir, &d, None)
            .unwrap();
        let lidded = vessel(
            &mut ctx,
            "Lidded",
            &Placement::default(),
            VesselClass::Reservoir,
            &d,
            Some(Lid {
                aperture_radius: 10.0,
            }),
        )
        .unwrap();

        assert!(ctx.diagnostics().is_empty());
        assert!(lidded.mesh.signed_volume() > open.mesh.signed_volume());
    }

    #[test]
    fn test_degenerate_dims_rejected() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let d = CylinderDims {
            radius: 0.0,
            height: 1.0,
        };
        assert!(vessel(&mut ctx, "Pot", &Placement::default(), VesselClass::Pot, &d, None).is_err());
    }

    #[test]
    fn test_wall_point() {
        let d = CylinderDims {
            radius: 0.2,
            height: 0.5,
        };
        let p = wall_point(DVec3::new(1.0, 1.0, 0.25), &d, DVec3::Y, 0.1);
        assert!(p.abs_diff_eq(DVec3::new(1.0, 1.2, 0.1), 1e-12));
    }
}

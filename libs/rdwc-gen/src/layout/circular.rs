//! # Circular Layout
//!
//! Pots on a ring around a central manifold block. Each outlet of the
//! block runs radially to an elbow above its pot and drops into a drip
//! emitter. The reservoir feeds the block from above.

use crate::dims::FittingKind;
use crate::error::SceneError;
use crate::layout::{balance, reservoir, Run};
use crate::parts::{self, ManifoldLayout};
use crate::placement::{pot_positions, Placement};
use config::constants::{RESERVOIR_OFFSET_FACTOR, ROUTE_CLEARANCE};
use glam::DVec3;
use log::warn;

/// Emitter height as a fraction of pot height.
const EMITTER_HEIGHT_RATIO: f64 = 0.8;
/// Elbow setback from the pot center toward the hub, in pot radii.
const DROP_SETBACK_RATIO: f64 = 0.25;

pub(crate) fn build(run: &mut Run) -> Result<(), SceneError> {
    let config = run.config;
    let ring_radius = config.layout.circle_radius;
    let pot = run.pot;
    let positions = pot_positions(&config.layout);

    for (i, position) in positions.iter().enumerate() {
        run.pot(&format!("Pot_circular_{i}"), *position)?;
    }

    let hub_z = pot.height + ROUTE_CLEARANCE;
    let hub = Placement::at(DVec3::new(0.0, 0.0, hub_z));
    let layout = ManifoldLayout::new(
        &run.geometry(FittingKind::ManifoldOutlet),
        positions.len() as u32,
    );
    let built = parts::manifold_block(&mut run.ctx, "Central_Manifold", &hub, &layout);
    run.add(built)?;
    let ports = layout.ports(&hub);
    let count = positions.len();
    let (Some(bottom), Some(top)) = (ports.get(count).copied(), ports.get(count + 1).copied())
    else {
        warn!("Central_Manifold: missing end ports");
        return Ok(());
    };

    for (i, (position, outlet)) in positions.iter().zip(&ports).enumerate() {
        let direction = outlet.direction;
        let radial = ring_radius - DROP_SETBACK_RATIO * pot.radius;
        let corner = DVec3::new(direction.x * radial, direction.y * radial, hub_z);
        let elbow = run.fitting(
            FittingKind::Elbow,
            &format!("Elbow_circular_{i}"),
            &Placement::from_basis(corner, -direction, DVec3::NEG_Z),
        )?;
        run.connect(&format!("Pipe_radial_{i}"), outlet, &elbow[0])?;

        let emitter_at = DVec3::new(corner.x, corner.y, position.z + EMITTER_HEIGHT_RATIO * pot.height);
        let emitter = run.fitting(
            FittingKind::DripEmitter,
            &format!("Drip_Emitter_{i}"),
            &Placement::at(emitter_at),
        )?;
        run.connect(&format!("Drop_{i}"), &elbow[1], &emitter[0])?;
    }

    run.cap("Hub_Bottom", &bottom)?;

    let fed = if config.features.enable_reservoir {
        let center = DVec3::new(0.0, -RESERVOIR_OFFSET_FACTOR * ring_radius, 0.0);
        reservoir::build(run, center, Some(top))?
    } else {
        false
    };
    if !fed {
        run.cap("Hub_Top", &top)?;
    }

    // Free-standing opposite the reservoir
    balance::tank(run, DVec3::new(0.0, RESERVOIR_OFFSET_FACTOR * ring_radius, 0.0))?;
    Ok(())
}

//! Air pump beside the reservoir and air stones on each pot floor.

use std::f64::consts::TAU;

use crate::error::SceneError;
use crate::layout::Run;
use crate::parts;
use crate::placement::Placement;
use config::constants::{AIR_PUMP_SIDE_OFFSET, AIR_STONE_HEIGHT_RATIO, AIR_STONE_RING_RATIO};
use glam::DVec3;

/// Air pump location when there is no reservoir to stand beside.
const FALLBACK_PUMP_LOCATION: DVec3 = DVec3::new(0.0, -2.0, 0.5);

pub(crate) fn build(run: &mut Run) -> Result<(), SceneError> {
    let features = &run.config.features;
    let (stone_type, per_pot, outlets) = (
        features.air_stone_type,
        features.air_stones_per_pot,
        features.air_pump_outlets,
    );

    let pump_at = match &run.reservoir {
        Some(res) => res.center + DVec3::X * (res.dims.radius + AIR_PUMP_SIDE_OFFSET),
        None => FALLBACK_PUMP_LOCATION,
    };
    let built = parts::air_pump(&mut run.ctx, "Air_Pump", &Placement::at(pump_at), outlets);
    run.add(built)?;

    let pots = run.pots.clone();
    for pot in &pots {
        let z = pot.floor() + AIR_STONE_HEIGHT_RATIO * pot.dims.height;
        for j in 0..per_pot {
            let (name, offset) = if per_pot == 1 {
                (format!("Air_Stone_{}", pot.name), DVec3::ZERO)
            } else {
                let angle = j as f64 * TAU / per_pot as f64;
                let ring = AIR_STONE_RING_RATIO * pot.dims.radius;
                (
                    format!("Air_Stone_{}_{j}", pot.name),
                    DVec3::new(ring * angle.cos(), ring * angle.sin(), 0.0),
                )
            };
            let at = DVec3::new(pot.center.x, pot.center.y, z) + offset;
            let built = parts::air_stone(&mut run.ctx, &name, &Placement::at(at), stone_type);
            run.add(built)?;
        }
    }
    Ok(())
}

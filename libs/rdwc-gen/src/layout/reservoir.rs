//! Reservoir with its pump, bulkhead, sensors and the feed line to the
//! system.

use std::f64::consts::FRAC_PI_2;

use crate::dims::{vessel_dims, FittingKind, VesselClass, VolumeSpec};
use crate::error::SceneError;
use crate::layout::route::Route;
use crate::layout::Run;
use crate::parts::{self, Lid};
use crate::placement::{Placement, Port};
use config::constants::ROUTE_CLEARANCE;
use glam::DVec3;
use log::debug;

const LID_APERTURE_RATIO: f64 = 0.35;
const PUMP_RADIUS_RATIO: f64 = 0.3;
const MAX_PUMP_RADIUS: f64 = 0.08;
const BULKHEAD_HEIGHT_RATIO: f64 = 0.25;

/// Builds the reservoir subtree centered above `floor_center`.
///
/// When `target` is given, a feed line runs from the pump bulkhead to it.
/// Returns whether that feed line was laid.
pub(crate) fn build(
    run: &mut Run,
    floor_center: DVec3,
    target: Option<Port>,
) -> Result<bool, SceneError> {
    let config = run.config;
    let Ok(volume) = VolumeSpec::from_liters(config.reservoir.volume_liters) else {
        debug!(
            "reservoir volume {} L, skipping reservoir",
            config.reservoir.volume_liters
        );
        return Ok(false);
    };
    let dims = vessel_dims(VesselClass::Reservoir, volume);
    let (r, h) = (dims.radius, dims.height);
    let center = DVec3::new(floor_center.x, floor_center.y, h / 2.0);

    let lid = config.reservoir.add_lid.then_some(Lid {
        aperture_radius: LID_APERTURE_RATIO * r,
    });
    let Some(reservoir) = run.vessel("Main_Reservoir", VesselClass::Reservoir, dims, center, lid)?
    else {
        return Ok(false);
    };
    let (x, y) = (center.x, center.y);

    let pump_radius = (PUMP_RADIUS_RATIO * r).min(MAX_PUMP_RADIUS);
    let wall = VesselClass::Reservoir.wall_thickness();
    let built = parts::pump(
        &mut run.ctx,
        "Main_Pump",
        &Placement::at(DVec3::new(x, y, reservoir.floor() + wall)),
        pump_radius,
        1.5 * pump_radius,
    );
    run.add(built)?;

    let bulkhead = run.fitting(
        FittingKind::Bulkhead,
        "Pump_Bulkhead",
        &Placement::along(DVec3::new(x + r, y, BULKHEAD_HEIGHT_RATIO * h), DVec3::X),
    )?;
    let outlet = bulkhead[1];

    if config.features.add_water_level_sensors {
        let built = parts::level_sensor(
            &mut run.ctx,
            "Water_Level_High",
            &Placement::at(DVec3::new(x + 0.5 * r, y, h - 0.1)),
        );
        run.add(built)?;
        let built = parts::level_sensor(
            &mut run.ctx,
            "Water_Level_Low",
            &Placement::at(DVec3::new(x, y + 0.5 * r, 0.2)),
        );
        run.add(built)?;
    }
    if config.features.add_probe_holders {
        let built = parts::probe_holder(
            &mut run.ctx,
            "Probe_Holder",
            &Placement::from_euler(DVec3::new(x - r + 0.05, y, h), DVec3::new(0.0, 0.0, -FRAC_PI_2)),
            config.features.probe_count,
        );
        run.add(built)?;
    }

    run.reservoir = Some(reservoir);

    let Some(target) = target else {
        return Ok(false);
    };
    let elbow = run.geometry(FittingKind::Elbow).connection_offset();
    let z_feed = run.pot.height.max(target.position.z + 2.0 * elbow) + ROUTE_CLEARANCE;
    let mut inline = Vec::new();
    if config.features.add_check_valves {
        inline.push((FittingKind::CheckValve, "Check_Valve".to_string()));
    }
    if config.features.add_flow_indicators {
        inline.push((FittingKind::FlowMeter, "Flow_Meter".to_string()));
    }
    let route = feed_route(outlet, target, z_feed, ROUTE_CLEARANCE + elbow, inline);
    run.route(&route)?;
    Ok(true)
}

/// Climbs out of the bulkhead, clears the pots at `z_feed` and drops onto
/// the target from above.
fn feed_route(
    outlet: Port,
    target: Port,
    z_feed: f64,
    lead: f64,
    inline: Vec<(FittingKind, String)>,
) -> Route {
    let c1 = outlet.position + outlet.direction * lead;
    let c2 = DVec3::new(c1.x, c1.y, z_feed);
    let c3 = DVec3::new(c1.x, target.position.y, z_feed);
    let c4 = DVec3::new(target.position.x, target.position.y, z_feed);
    Route::new("Feed", outlet, vec![c1, c2, c3, c4], target).with_inline(1, inline)
}

//! Balance tank. In grid layouts it closes the manifold loop: both lines
//! turn at the first column into a junction tee whose branch runs to the
//! tank, so the water level stays equal in every pot.

use crate::dims::{vessel_dims, CylinderDims, FittingKind, VesselClass, VolumeSpec};
use crate::error::SceneError;
use crate::layout::grid::ManifoldFrame;
use crate::layout::route::Route;
use crate::layout::{Run, Vessel};
use crate::parts::vessel::wall_point;
use crate::placement::{Placement, Port};
use config::constants::{BALANCE_OFFSET_FACTOR, ROUTE_CLEARANCE};
use glam::DVec3;
use log::debug;

/// Tank dimensions, or `None` when the tank is disabled or its volume is
/// not positive.
fn tank_dims(run: &Run) -> Option<CylinderDims> {
    if !run.config.features.enable_balance_tank {
        return None;
    }
    let liters = run.config.balance_tank.volume_factor * run.pot_volume.liters();
    match VolumeSpec::from_liters(liters) {
        Ok(volume) => Some(vessel_dims(VesselClass::BalanceTank, volume)),
        Err(err) => {
            debug!("skipping balance tank: {err}");
            None
        }
    }
}

/// Whether a balance tank will be attached to the manifolds.
pub(crate) fn planned(run: &Run) -> bool {
    tank_dims(run).is_some()
}

/// Places a free-standing tank above `floor_center`.
pub(crate) fn tank(run: &mut Run, floor_center: DVec3) -> Result<Option<Vessel>, SceneError> {
    let Some(dims) = tank_dims(run) else {
        return Ok(None);
    };
    let center = DVec3::new(floor_center.x, floor_center.y, dims.height / 2.0);
    run.vessel("Balance_Tank", VesselClass::BalanceTank, dims, center, None)
}

/// Tank in front of the outlet manifold, joined to the open first mouths
/// of both manifold lines.
pub(crate) fn build_grid(run: &mut Run, frame: &ManifoldFrame) -> Result<(), SceneError> {
    let spacing = run.config.layout.spacing_x;
    let y_tank = frame.y_out - BALANCE_OFFSET_FACTOR * run.config.layout.spacing_y;
    let Some(tank) = tank(run, DVec3::new(frame.width / 2.0, y_tank, 0.0))? else {
        return Ok(());
    };

    let x = -spacing / 2.0;
    let z = frame.inlet_first.position.z;
    let y_mid = (frame.y_in + frame.y_out) / 2.0;

    let elbow_in = run.fitting(
        FittingKind::Elbow,
        "Balance_Elbow_In",
        &Placement::from_basis(DVec3::new(x, frame.y_in, z), DVec3::X, DVec3::NEG_Y),
    )?;
    let elbow_out = run.fitting(
        FittingKind::Elbow,
        "Balance_Elbow_Out",
        &Placement::from_basis(DVec3::new(x, frame.y_out, z), DVec3::X, DVec3::Y),
    )?;
    // Tee ports come out as [+Y, −Y, −X]
    let junction = run.fitting(
        FittingKind::Tee,
        "Balance_Junction",
        &Placement::from_basis(DVec3::new(x, y_mid, z), DVec3::Y, DVec3::NEG_X),
    )?;

    run.connect("Balance_Pipe_In", &frame.inlet_first, &elbow_in[0])?;
    run.connect("Balance_Pipe_Out", &frame.outlet_first, &elbow_out[0])?;
    run.connect("Balance_Riser_In", &elbow_in[1], &junction[0])?;
    run.connect("Balance_Riser_Out", &elbow_out[1], &junction[1])?;

    let branch = junction[2];
    let elbow = run.geometry(FittingKind::Elbow).connection_offset();
    let c1 = branch.position + branch.direction * (ROUTE_CLEARANCE + elbow);
    let c2 = DVec3::new(c1.x, y_tank, z);
    let inlet = Port::new(
        wall_point(tank.center, &tank.dims, DVec3::NEG_X, z - tank.floor()),
        DVec3::NEG_X,
    );
    run.route(&Route::new("Balance", branch, vec![c1, c2], inlet))
}

//! # Grid and Linear Layouts
//!
//! Pots sit on a rectangular lattice. Two manifold lines run along X: the
//! inlet beyond the last row and the outlet in front of row 0. Every
//! column has one tee on each line whose branch feeds that column's pots.
//!
//! ```text
//!   inlet   ──T────T────T──   y_in
//!             │    │    │
//!             P    P    P     rows
//!             │    │    │
//!   outlet  ──T────T────T──   y_out
//! ```

use std::f64::consts::PI;

use crate::dims::FittingKind;
use crate::error::SceneError;
use crate::layout::{balance, reservoir, Run};
use crate::placement::{connection_span, pipe_height, port_facing, Placement, Port};
use config::constants::{DRAIN_VALVE_SETBACK, MANIFOLD_OFFSET_FACTOR, RESERVOIR_OFFSET_FACTOR};
use glam::DVec3;
use log::{debug, warn};

/// Where the manifold lines ended up, for the stages that attach to them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ManifoldFrame {
    /// Distance from the first to the last column.
    pub width: f64,
    pub y_in: f64,
    pub y_out: f64,
    /// Pipe plane height at the system center.
    pub z_center: f64,
    /// Open −X mouth of the first inlet tee.
    pub inlet_first: Port,
    /// Open −X mouth of the first outlet tee.
    pub outlet_first: Port,
}

/// Places pots, both manifolds and the pot connections, then hands off to
/// the reservoir and balance tank stages.
pub(crate) fn build(run: &mut Run) -> Result<(), SceneError> {
    let config = run.config;
    let layout = &config.layout;
    let rows = layout.effective_rows();
    let columns = layout.columns;
    let (sx, sy) = (layout.spacing_x, layout.spacing_y);
    let pot = run.pot;
    let pipe_cfg = &config.pipe;

    let width = (columns - 1) as f64 * sx;
    let y_in = (rows - 1) as f64 * sy + MANIFOLD_OFFSET_FACTOR * sy;
    let y_out = -MANIFOLD_OFFSET_FACTOR * sy;
    let z_at = |x: f64| {
        pipe_height(
            pot.height,
            pipe_cfg.height_percent,
            pipe_cfg.slope_degrees,
            x - width / 2.0,
        )
    };
    debug!("manifolds at y = {y_in} and y = {y_out}, width {width}");

    let balance_planned = balance::planned(run);
    let mut inlet_prev: Option<Port> = None;
    let mut outlet_prev: Option<Port> = None;
    let mut inlet_first = None;
    let mut outlet_first = None;

    for c in 0..columns {
        let x = c as f64 * sx;
        let z = z_at(x);

        // Inlet tee turned half a revolution so its branch faces the pots
        let inlet = run.fitting(
            FittingKind::Tee,
            &format!("Tee_Inlet_{c}"),
            &Placement::from_euler(DVec3::new(x, y_in, z), DVec3::new(0.0, 0.0, PI)),
        )?;
        let outlet = run.fitting(
            FittingKind::Tee,
            &format!("Tee_Outlet_{c}"),
            &Placement::at(DVec3::new(x, y_out, z)),
        )?;
        let (Some(in_west), Some(in_east), Some(in_branch)) = (
            port_facing(&inlet, DVec3::NEG_X),
            port_facing(&inlet, DVec3::X),
            port_facing(&inlet, DVec3::NEG_Y),
        ) else {
            warn!("Tee_Inlet_{c}: unexpected port layout");
            continue;
        };
        let (Some(out_west), Some(out_east), Some(out_branch)) = (
            port_facing(&outlet, DVec3::NEG_X),
            port_facing(&outlet, DVec3::X),
            port_facing(&outlet, DVec3::Y),
        ) else {
            warn!("Tee_Outlet_{c}: unexpected port layout");
            continue;
        };

        match (inlet_prev, outlet_prev) {
            (Some(prev_in), Some(prev_out)) => {
                manifold_segment(run, &format!("In_{}", c - 1), &prev_in, &in_west)?;
                manifold_segment(run, &format!("Out_{}", c - 1), &prev_out, &out_west)?;
            }
            _ => {
                inlet_first = Some(in_west);
                outlet_first = Some(out_west);
                if !balance_planned {
                    run.cap("In_First", &in_west)?;
                    run.cap("Out_First", &out_west)?;
                }
            }
        }
        if c + 1 == columns {
            run.cap("In_Last", &in_east)?;
            run.cap("Out_Last", &out_east)?;
        }
        inlet_prev = Some(in_east);
        outlet_prev = Some(out_east);

        for r in 0..rows {
            let y = r as f64 * sy;
            let name = format!("Pot_{r}_{c}");
            run.pot(&name, DVec3::new(x, y, 0.0))?;

            let pot_in = Port::new(DVec3::new(x, y + pot.radius, z), DVec3::Y);
            let pot_out = Port::new(DVec3::new(x, y - pot.radius, z), DVec3::NEG_Y);
            if config.features.add_drain_valves {
                drain_valve(run, r, c, &in_branch, &pot_in)?;
            } else {
                run.connect(&format!("Pot_Pipe_In_{r}_{c}"), &in_branch, &pot_in)?;
            }
            run.connect(&format!("Pot_Pipe_Out_{r}_{c}"), &pot_out, &out_branch)?;
        }
    }

    let (Some(inlet_first), Some(outlet_first)) = (inlet_first, outlet_first) else {
        return Ok(());
    };
    let frame = ManifoldFrame {
        width,
        y_in,
        y_out,
        z_center: z_at(width / 2.0),
        inlet_first,
        outlet_first,
    };

    if config.features.enable_reservoir {
        let center = DVec3::new(width / 2.0, y_out - RESERVOIR_OFFSET_FACTOR * sy, 0.0);
        // Feed drops onto the top of the inlet line at its center
        let target = Port::new(
            DVec3::new(width / 2.0, y_in, frame.z_center + run.pipe.radius()),
            DVec3::Z,
        );
        reservoir::build(run, center, Some(target))?;
    }
    if balance_planned {
        balance::build_grid(run, &frame)?;
    }
    Ok(())
}

/// One manifold pipe between neighbouring tees, split by a union if enabled.
fn manifold_segment(run: &mut Run, suffix: &str, from: &Port, to: &Port) -> Result<(), SceneError> {
    let pipe_name = format!("Manifold_Pipe_{suffix}");
    if !run.config.features.use_unions {
        run.connect(&pipe_name, from, to)?;
        return Ok(());
    }
    let Some(span) = connection_span(from, to, run.config.pipe.insertion_depth) else {
        warn!("{pipe_name}: tees too close for a union");
        return Ok(());
    };
    let ports = run.fitting(
        FittingKind::Union,
        &format!("Union_{suffix}"),
        &Placement::along(span.midpoint(), span.direction()),
    )?;
    run.connect(&format!("{pipe_name}_1"), from, &ports[0])?;
    run.connect(&format!("{pipe_name}_2"), &ports[1], to)?;
    Ok(())
}

/// Ball valve set back from the pot wall on the feed line.
fn drain_valve(
    run: &mut Run,
    row: u32,
    column: u32,
    branch: &Port,
    pot_port: &Port,
) -> Result<(), SceneError> {
    let offset = run.geometry(FittingKind::BallValve).connection_offset();
    let flow = -pot_port.direction;
    let center = pot_port.position - flow * (DRAIN_VALVE_SETBACK + offset);
    let ports = run.fitting(
        FittingKind::BallValve,
        &format!("Valve_In_{row}_{column}"),
        &Placement::along(center, flow),
    )?;
    run.connect(&format!("Pipe_to_valve_in_{row}_{column}"), branch, &ports[0])?;
    run.connect(
        &format!("Pipe_from_valve_in_{row}_{column}"),
        &ports[1],
        pot_port,
    )?;
    Ok(())
}

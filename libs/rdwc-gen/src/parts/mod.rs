//! # Component Mesh Factories
//!
//! One free function per part type. Every factory builds its mesh in a
//! local frame (origin at the part's logical center), composes it from
//! primitives through the run's [`Compositor`], and returns a [`Solid`]
//! placed by the given [`Placement`].
//!
//! ## Failure Semantics
//!
//! - Degenerate parameters return `Err(MeshError::DegenerateGeometry)`.
//! - A failed boolean step is recorded in the context and the part keeps
//!   whatever shape it had before that step.
//!
//! [`Placement`]: crate::placement::Placement

pub mod accessory;
pub mod fitting;
pub mod pipe;
pub mod valve;
pub mod vessel;

pub use accessory::{air_pump, air_stone, level_sensor, light_panel, probe_holder, pump};
pub use fitting::{
    bulkhead, drip_emitter, elbow, end_cap, manifold_block, tee, union_fitting, ManifoldLayout,
};
pub use pipe::pipe;
pub use valve::{ball_valve, check_valve, flow_meter};
pub use vessel::{vessel, Lid};

use crate::compose::{BooleanOp, Compositor};
use crate::scene::{Modifier, PartKind, Shading, Solid};
use crate::settings::Resolution;
use config::constants::{BEVEL_ANGLE_LIMIT_DEG, BEVEL_SEGMENTS, BEVEL_WIDTH_RATIO};
use glam::{DMat4, DQuat, DVec3};
use log::warn;
use rdwc_mesh::primitives::create_cylinder;
use rdwc_mesh::{Mesh, MeshError, MeshResult};

/// A recovered failure recorded during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Name of the part being built.
    pub part: String,
    pub message: String,
}

/// Shared state of the factories for one run.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub resolution: Resolution,
    compositor: &'a Compositor,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BuildContext<'a> {
    pub fn new(resolution: Resolution, compositor: &'a Compositor) -> Self {
        Self {
            resolution,
            compositor,
            diagnostics: Vec::new(),
        }
    }

    /// Applies a boolean step, recording a diagnostic when it fails.
    ///
    /// Returns whether `base` changed.
    pub fn compose(&mut self, base: &mut Solid, cutter: Solid, op: BooleanOp) -> bool {
        match self.compositor.compose(base, cutter, op) {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                self.diagnostics.push(Diagnostic {
                    part: base.name.clone(),
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Composes a local mesh into `base`. Both share the base's local frame.
    pub fn compose_mesh(&mut self, base: &mut Solid, mesh: Mesh, op: BooleanOp) -> bool {
        let cutter = Solid::new(format!("{}_{}", base.name, op_suffix(op)), mesh, base.kind);
        self.compose(base, cutter, op)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

fn op_suffix(op: BooleanOp) -> &'static str {
    match op {
        BooleanOp::Union => "part",
        BooleanOp::Difference => "cutter",
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Cylinder or frustum from `start` to `end` in a part's local frame.
pub(crate) fn cylinder_between(
    start: DVec3,
    end: DVec3,
    radius_start: f64,
    radius_end: f64,
    segments: u32,
) -> MeshResult<Mesh> {
    let axis = end - start;
    let length = axis.length();
    if !length.is_finite() || length <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Cylinder endpoints coincide: {start} -> {end}"
        )));
    }
    let mut mesh = create_cylinder(length, radius_start, radius_end, false, segments)?;
    let rotation = DQuat::from_rotation_arc(DVec3::Z, axis / length);
    mesh.transform(&DMat4::from_rotation_translation(rotation, start));
    Ok(mesh)
}

/// Mesh placed at `offset` in a part's local frame.
pub(crate) fn shifted(mut mesh: Mesh, offset: DVec3) -> Mesh {
    mesh.translate(offset);
    mesh
}

/// Smooth shading plus the soft-edge bevel every molded fitting gets.
pub(crate) fn finish_fitting(solid: &mut Solid, wall_thickness: f64) {
    solid.shading = Shading::Smooth;
    solid.modifiers.push(Modifier::Bevel {
        width: BEVEL_WIDTH_RATIO * wall_thickness,
        segments: BEVEL_SEGMENTS,
        angle_limit: BEVEL_ANGLE_LIMIT_DEG.to_radians(),
    });
}

/// Starts a part from its first mesh.
pub(crate) fn start(name: &str, mesh: Mesh, kind: PartKind) -> Solid {
    Solid::new(name, mesh, kind)
}

/// Rejects non-positive or non-finite sizes.
pub(crate) fn check_positive(part: &str, what: &str, value: f64) -> MeshResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::degenerate(format!(
            "{part} {what} must be positive: {value}"
        )))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::BooleanSolver;
    use approx::assert_relative_eq;
    use rdwc_mesh::primitives::create_cube;

    struct Refuse;

    impl BooleanSolver for Refuse {
        fn solve(&self, _: BooleanOp, _: &Mesh, _: &Mesh) -> MeshResult<Mesh> {
            Err(MeshError::boolean_failed("refused"))
        }
    }

    #[test]
    fn test_cylinder_between_spans_endpoints() {
        let start = DVec3::new(1.0, 2.0, 3.0);
        let end = DVec3::new(1.0, 2.5, 3.0);
        let mesh = cylinder_between(start, end, 0.1, 0.1, 16).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(max.y, 2.5, epsilon = 1e-12);
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_cylinder_between_rejects_zero_length() {
        let err = cylinder_between(DVec3::ONE, DVec3::ONE, 0.1, 0.1, 16).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_failed_compose_records_diagnostic() {
        let compositor = Compositor::new(Box::new(Refuse));
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let mut base = start("Box", create_cube(DVec3::ONE, true).unwrap(), PartKind::Tee);
        let cut = create_cube(DVec3::splat(0.5), true).unwrap();

        assert!(!ctx.compose_mesh(&mut base, cut, BooleanOp::Difference));
        assert_eq!(base.mesh.vertex_count(), 8);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].part, "Box");
    }
}

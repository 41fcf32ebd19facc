//! # Pipes
//!
//! A pipe is a plain cylinder between two points. Its local frame sits at
//! the span's midpoint with local Z running from start to end, so the
//! transform alone tells where the pipe goes.

use crate::parts::{check_positive, BuildContext};
use crate::placement::{Placement, Span};
use crate::scene::{PartKind, Solid};
use config::constants::MIN_PIPE_LENGTH;
use log::debug;
use rdwc_mesh::primitives::create_cylinder;
use rdwc_mesh::MeshResult;

/// Builds the pipe filling `span`.
///
/// Returns `Ok(None)` when the span is shorter than the minimum pipe length.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rdwc_gen::compose::Compositor;
/// use rdwc_gen::parts::{pipe, BuildContext};
/// use rdwc_gen::placement::Span;
/// use rdwc_gen::settings::Resolution;
///
/// let compositor = Compositor::default();
/// let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
/// let span = Span { start: DVec3::ZERO, end: DVec3::new(0.5, 0.0, 0.0) };
/// let solid = pipe(&mut ctx, "Pipe", &span, 0.0125).unwrap().unwrap();
/// assert!((solid.location() - DVec3::new(0.25, 0.0, 0.0)).length() < 1e-12);
/// ```
pub fn pipe(
    ctx: &mut BuildContext,
    name: &str,
    span: &Span,
    radius: f64,
) -> MeshResult<Option<Solid>> {
    check_positive(name, "radius", radius)?;
    let length = span.length();
    if !length.is_finite() || length < MIN_PIPE_LENGTH {
        debug!("{name}: span of {length:.6} m is too short for a pipe");
        return Ok(None);
    }

    let mesh = create_cylinder(length, radius, radius, true, ctx.resolution.pipe_segments)?;
    let placement = Placement::along(span.midpoint(), span.direction());
    Ok(Some(Solid::placed(name, mesh, PartKind::Pipe, &placement)))
}

// =============================================================================
// TESTS
// =============================================================================

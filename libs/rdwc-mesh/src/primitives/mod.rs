//! # Primitives
//!
//! Closed-mesh generation for the base solids every part is assembled from.
//! All primitives are centered on the local origin with Z as their axis,
//! and every mesh is closed so it can be used as a boolean operand.

pub mod cube;
pub mod cylinder;
pub mod revolve;
pub mod sphere;
pub mod torus;

pub use cube::create_cube;
pub use cylinder::create_cylinder;
pub use revolve::create_revolved;
pub use sphere::create_sphere;
pub use torus::create_torus;

use crate::error::{MeshError, MeshResult};

/// Rejects segment counts that cannot form a polygon.
pub(crate) fn check_segments(kind: &str, segments: u32) -> MeshResult<()> {
    if segments < config::constants::MIN_SEGMENTS {
        return Err(MeshError::degenerate(format!(
            "{kind} segments must be at least 3: {segments}"
        )));
    }
    Ok(())
}

//! # Boolean Compositor
//!
//! Applies union and difference between placed solids. The cutter is mapped
//! into the base's local frame, solved, and the result checked before it
//! replaces the base mesh. Any failure leaves the base exactly as it was.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use rdwc_gen::compose::{BooleanOp, Compositor};
//! use rdwc_gen::scene::{PartKind, Solid};
//! use rdwc_mesh::primitives::{create_cube, create_cylinder};
//!
//! let block = create_cube(DVec3::splat(1.0), true).unwrap();
//! let bore = create_cylinder(2.0, 0.2, 0.2, true, 12).unwrap();
//! let mut base = Solid::new("Block", block, PartKind::ManifoldBlock);
//! let cutter = Solid::new("Bore", bore, PartKind::ManifoldBlock);
//!
//! Compositor::default().compose(&mut base, cutter, BooleanOp::Difference).unwrap();
//! assert!(base.mesh.signed_volume() < 1.0);
//! ```

use std::fmt;

use crate::error::CompositionError;
use crate::scene::Solid;
use rdwc_mesh::{Mesh, MeshResult};

/// Boolean operations the factories use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => f.write_str("Union"),
            Self::Difference => f.write_str("Difference"),
        }
    }
}

/// Solves one boolean between two meshes in the same frame.
pub trait BooleanSolver {
    fn solve(&self, op: BooleanOp, base: &Mesh, cutter: &Mesh) -> MeshResult<Mesh>;
}

/// BSP tree solver from the mesh kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspSolver;

impl BooleanSolver for BspSolver {
    fn solve(&self, op: BooleanOp, base: &Mesh, cutter: &Mesh) -> MeshResult<Mesh> {
        match op {
            BooleanOp::Union => rdwc_mesh::union(base, cutter),
            BooleanOp::Difference => rdwc_mesh::difference(base, cutter),
        }
    }
}

/// Boolean front end shared by every factory of a run.
pub struct Compositor {
    solver: Box<dyn BooleanSolver>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Box::new(BspSolver))
    }
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor").finish_non_exhaustive()
    }
}

impl Compositor {
    pub fn new(solver: Box<dyn BooleanSolver>) -> Self {
        Self { solver }
    }

    /// Combines `cutter` into `base` and drops the cutter.
    ///
    /// On error `base` is untouched; the cutter is dropped either way.
    pub fn compose(
        &self,
        base: &mut Solid,
        cutter: Solid,
        op: BooleanOp,
    ) -> Result<(), CompositionError> {
        self.compose_keep(base, &cutter, op)
    }

    /// Combines `cutter` into `base`, leaving the cutter for the caller.
    pub fn compose_keep(
        &self,
        base: &mut Solid,
        cutter: &Solid,
        op: BooleanOp,
    ) -> Result<(), CompositionError> {
        let to_base = base.transform.inverse() * cutter.transform;
        let local_cutter = cutter.mesh.transformed(&to_base);

        let result = self
            .solver
            .solve(op, &base.mesh, &local_cutter)
            .map_err(|source| CompositionError::Solver {
                base: base.name.clone(),
                cutter: cutter.name.clone(),
                op,
                source,
            })?;

        if result.has_non_finite() {
            return Err(CompositionError::NonFinite {
                base: base.name.clone(),
                cutter: cutter.name.clone(),
                op,
            });
        }
        if result.is_empty() && !base.mesh.is_empty() {
            return Err(CompositionError::EmptyResult {
                base: base.name.clone(),
                cutter: cutter.name.clone(),
                op,
            });
        }

        base.mesh = result;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PartKind;
    use glam::{DMat4, DVec3};
    use rdwc_mesh::primitives::create_cube;
    use rdwc_mesh::MeshError;

    struct FailingSolver;

    impl BooleanSolver for FailingSolver {
        fn solve(&self, _op: BooleanOp, _base: &Mesh, _cutter: &Mesh) -> MeshResult<Mesh> {
            Err(MeshError::boolean_failed("injected"))
        }
    }

    struct NanSolver;

    impl BooleanSolver for NanSolver {
        fn solve(&self, _op: BooleanOp, base: &Mesh, _cutter: &Mesh) -> MeshResult<Mesh> {
            let mut mesh = base.clone();
            mesh.vertices_mut()[0] = DVec3::NAN;
            Ok(mesh)
        }
    }

    fn cube(name: &str, size: f64) -> Solid {
        Solid::new(
            name,
            create_cube(DVec3::splat(size), true).unwrap(),
            PartKind::Tee,
        )
    }

    #[test]
    fn test_failed_union_leaves_base_intact() {
        let compositor = Compositor::new(Box::new(FailingSolver));
        let mut base = cube("Base", 1.0);
        let before = base.mesh.clone();
        let cutter = cube("Cutter", 0.5);

        let err = compositor
            .compose(&mut base, cutter, BooleanOp::Union)
            .unwrap_err();

        assert!(matches!(err, CompositionError::Solver { .. }));
        assert_eq!(base.mesh.vertex_count(), before.vertex_count());
        assert_eq!(base.mesh, before);
    }

    #[test]
    fn test_non_finite_result_rejected() {
        let compositor = Compositor::new(Box::new(NanSolver));
        let mut base = cube("Base", 1.0);
        let err = compositor
            .compose(&mut base, cube("Cutter", 0.5), BooleanOp::Difference)
            .unwrap_err();
        assert!(matches!(err, CompositionError::NonFinite { .. }));
        assert!(!base.mesh.has_non_finite());
    }

    #[test]
    fn test_erasing_difference_rejected() {
        let compositor = Compositor::default();
        let mut base = cube("Base", 1.0);
        let err = compositor
            .compose(&mut base, cube("Cutter", 2.0), BooleanOp::Difference)
            .unwrap_err();
        assert!(matches!(err, CompositionError::EmptyResult { .. }));
        assert_eq!(base.mesh.triangle_count(), 12);
    }

    #[test]
    fn test_cutter_mapped_into_base_frame() {
        let compositor = Compositor::default();
        let mut base = cube("Base", 1.0);
        base.transform = DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0));

        // Same world position as the base: the difference must remove volume
        let mut cutter = cube("Cutter", 0.5);
        cutter.transform = DMat4::from_translation(DVec3::new(5.5, 0.0, 0.0));

        compositor
            .compose_keep(&mut base, &cutter, BooleanOp::Difference)
            .unwrap();
        let volume = base.mesh.signed_volume();
        assert!(volume < 1.0 - 1e-6, "volume {volume}");
        assert!(volume > 0.5);
        assert_eq!(cutter.name, "Cutter");
    }
}

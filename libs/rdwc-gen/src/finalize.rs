//! # Finalization Pass
//!
//! Bakes the piping into one solid. Pipes and simple fittings are taken
//! out of their groups, their pending modifiers are applied, and their
//! world meshes are merged into `RDWC_Piping_System` in the System group.
//!
//! With optimization enabled the merged mesh is welded (vertices within
//! [`WELD_DISTANCE`] collapse), shaded smooth, and given a pending edge
//! split so hard fitting edges stay crisp.

use crate::error::SceneError;
use crate::scene::{Category, Modifier, PartKind, Scene, Shading, Solid};
use config::constants::{EDGE_SPLIT_ANGLE_DEG, WELD_DISTANCE};
use log::{debug, info};
use rdwc_mesh::ops::{weld_vertices, WeldReport};
use rdwc_mesh::Mesh;

/// Name of the merged piping solid.
pub const PIPING_SYSTEM_NAME: &str = "RDWC_Piping_System";

/// What the pass merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReport {
    pub merged_parts: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Present when the mesh was welded.
    pub weld: Option<WeldReport>,
}

fn is_piping(solid: &Solid) -> bool {
    solid.kind.category() == Category::Pipes || solid.kind.is_simple_fitting()
}

/// Merges the piping into a single solid.
///
/// Returns `None` when the scene has no piping. Valves, meters and every
/// non-piping part stay as they are.
pub fn finalize(scene: &mut Scene, optimize: bool) -> Result<Option<FinalizeReport>, SceneError> {
    let parts = scene.take(is_piping);
    if parts.is_empty() {
        debug!("no piping to merge");
        return Ok(None);
    }
    let merged_parts = parts.len();

    let mut mesh = Mesh::new();
    for mut part in parts {
        part.apply_modifiers();
        mesh.merge(&part.world_mesh());
    }

    let mut system = Solid::new(PIPING_SYSTEM_NAME, Mesh::new(), PartKind::PipingSystem);
    let weld = if optimize {
        let (welded, report) = weld_vertices(&mesh, WELD_DISTANCE);
        debug!(
            "weld: {} vertices merged, {} triangles removed",
            report.merged_vertices, report.removed_triangles
        );
        mesh = welded;
        system.shading = Shading::Smooth;
        system.modifiers.push(Modifier::EdgeSplit {
            angle: EDGE_SPLIT_ANGLE_DEG.to_radians(),
        });
        Some(report)
    } else {
        None
    };
    system.mesh = mesh;

    let report = FinalizeReport {
        merged_parts,
        vertices: system.mesh.vertex_count(),
        triangles: system.mesh.triangle_count(),
        weld,
    };
    info!(
        "Merged {merged_parts} piping parts into {PIPING_SYSTEM_NAME}: {} vertices, {} triangles",
        report.vertices, report.triangles
    );
    scene.link(system)?;
    Ok(Some(report))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Compositor;
    use crate::parts::{self, BuildContext};
    use crate::placement::Span;
    use crate::settings::Resolution;
    use glam::DVec3;

    fn pipe(ctx: &mut BuildContext, name: &str, start: f64, end: f64) -> Solid {
        let span = Span {
            start: DVec3::new(start, 0.0, 0.1),
            end: DVec3::new(end, 0.0, 0.1),
        };
        parts::pipe(ctx, name, &span, 0.0125).unwrap().unwrap()
    }

    #[test]
    fn test_weld_closes_small_gap() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let mut scene = Scene::new();
        scene.link(pipe(&mut ctx, "Pipe_A", 0.0, 0.5)).unwrap();
        scene.link(pipe(&mut ctx, "Pipe_B", 0.5005, 1.0)).unwrap();

        let report = finalize(&mut scene, true).unwrap().unwrap();
        assert_eq!(report.merged_parts, 2);
        // Three rings of twelve once the facing rings collapse
        assert_eq!(report.vertices, 36);
        assert_eq!(report.weld.map(|w| w.merged_vertices), Some(12));

        let system = scene.find(PIPING_SYSTEM_NAME).unwrap();
        assert_eq!(system.shading, Shading::Smooth);
        assert!(matches!(system.modifiers[..], [Modifier::EdgeSplit { .. }]));
        assert_eq!(scene.count(Category::Pipes), 0);
        assert_eq!(scene.count(Category::System), 1);
    }

    #[test]
    fn test_without_optimization_keeps_vertices() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let mut scene = Scene::new();
        scene.link(pipe(&mut ctx, "Pipe_A", 0.0, 0.5)).unwrap();
        scene.link(pipe(&mut ctx, "Pipe_B", 0.5005, 1.0)).unwrap();

        let report = finalize(&mut scene, false).unwrap().unwrap();
        assert_eq!(report.vertices, 48);
        assert!(report.weld.is_none());
        let system = scene.find(PIPING_SYSTEM_NAME).unwrap();
        assert!(system.modifiers.is_empty());
    }

    #[test]
    fn test_valves_stay_separate() {
        let compositor = Compositor::default();
        let mut ctx = BuildContext::new(Resolution::preview(), &compositor);
        let mut scene = Scene::new();
        let mut valve = pipe(&mut ctx, "Valve", 0.0, 0.1);
        valve.kind = PartKind::BallValve;
        scene.link(valve).unwrap();

        assert!(finalize(&mut scene, true).unwrap().is_none());
        assert!(scene.contains("Valve"));
    }
}

//! # Edge Softening
//!
//! Approximates a bevel on sharp edges without changing topology: every
//! vertex touching a sharp edge is relaxed toward the centroid of its
//! neighbours over a number of steps. Each step moves a vertex at most
//! `width / segments`, so the total displacement never exceeds `width`.
//!
//! Because only positions change, a closed mesh stays closed and the
//! vertex count is preserved for the later weld pass.

use std::collections::{BTreeSet, HashMap};

use crate::mesh::Mesh;
use glam::DVec3;

/// Softens edges whose dihedral angle exceeds `angle_limit` (radians).
///
/// ## Parameters
///
/// - `mesh`: mesh to modify in place
/// - `width`: maximum total displacement of any vertex
/// - `segments`: number of relaxation steps
/// - `angle_limit`: edges bent less than this are left alone
///
/// ## Returns
///
/// Number of vertices that were moved.
pub fn bevel_sharp_edges(mesh: &mut Mesh, width: f64, segments: u32, angle_limit: f64) -> usize {
    if mesh.is_empty() || width.is_nan() || width <= 0.0 || segments == 0 {
        return 0;
    }

    let face_normals: Vec<DVec3> = (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle_positions(i);
            (b - a).cross(c - a).normalize_or_zero()
        })
        .collect();

    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (t, tri) in mesh.triangles().iter().enumerate() {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            edge_faces.entry((a.min(b), a.max(b))).or_default().push(t);
        }
    }

    let cos_limit = angle_limit.cos();
    let mut neighbours: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); mesh.vertex_count()];
    let mut sharp = vec![false; mesh.vertex_count()];

    for (&(a, b), faces) in &edge_faces {
        neighbours[a as usize].insert(b);
        neighbours[b as usize].insert(a);
        // Open edges belong to a single face and are never softened
        if let [f1, f2] = faces.as_slice() {
            if face_normals[*f1].dot(face_normals[*f2]) < cos_limit {
                sharp[a as usize] = true;
                sharp[b as usize] = true;
            }
        }
    }

    let movable: Vec<usize> = (0..mesh.vertex_count())
        .filter(|&v| sharp[v] && !neighbours[v].is_empty())
        .collect();
    if movable.is_empty() {
        return 0;
    }

    let step = width / segments as f64;
    for _ in 0..segments {
        let snapshot = mesh.vertices().to_vec();
        let vertices = mesh.vertices_mut();
        for &v in &movable {
            let around = &neighbours[v];
            let centroid = around
                .iter()
                .fold(DVec3::ZERO, |acc, &n| acc + snapshot[n as usize])
                / around.len() as f64;
            let delta = centroid - snapshot[v];
            vertices[v] = snapshot[v] + delta.clamp_length_max(step);
        }
    }

    movable.len()
}

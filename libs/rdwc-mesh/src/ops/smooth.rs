//! # Smooth Normals with Edge Split
//!
//! Produces per-vertex normals for smooth shading while keeping edges
//! sharper than a split angle crisp. A vertex whose incident faces fall
//! into several smoothing groups is duplicated once per group.

use std::collections::HashMap;

use crate::mesh::Mesh;
use glam::DVec3;

/// Two corner normals closer than this (in 1 - cos) share a vertex.
const NORMAL_MATCH: f64 = 1e-9;

/// Returns a copy of `mesh` with smooth normals, split at sharp edges.
///
/// With `split_angle` set (radians), each triangle corner averages only
/// the incident faces whose normal is within that angle of its own face.
/// With `None`, all incident faces are averaged and no vertex is split.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use rdwc_mesh::primitives::create_cube;
/// use rdwc_mesh::ops::split_normals;
///
/// let cube = create_cube(DVec3::splat(1.0), true).unwrap();
/// let split = split_normals(&cube, Some(30f64.to_radians()));
/// // Every corner belongs to three faces at 90 degrees
/// assert_eq!(split.vertex_count(), 24);
/// ```
pub fn split_normals(mesh: &Mesh, split_angle: Option<f64>) -> Mesh {
    let face_areas: Vec<DVec3> = (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle_positions(i);
            (b - a).cross(c - a)
        })
        .collect();
    let face_normals: Vec<DVec3> = face_areas.iter().map(|n| n.normalize_or_zero()).collect();

    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertex_count()];
    for (t, tri) in mesh.triangles().iter().enumerate() {
        for &v in tri {
            incident[v as usize].push(t);
        }
    }

    let cos_limit = split_angle.map(f64::cos);
    let mut out = Mesh::with_capacity(mesh.vertex_count(), mesh.triangle_count());
    let mut normals = Vec::with_capacity(mesh.vertex_count());
    let mut groups: HashMap<u32, Vec<(DVec3, u32)>> = HashMap::new();

    for (t, tri) in mesh.triangles().iter().enumerate() {
        let mut corners = [0u32; 3];
        for (k, &v) in tri.iter().enumerate() {
            let own = face_normals[t];
            let normal = incident[v as usize]
                .iter()
                .filter(|&&f| cos_limit.map_or(true, |limit| own.dot(face_normals[f]) >= limit))
                .fold(DVec3::ZERO, |acc, &f| acc + face_areas[f])
                .normalize_or_zero();

            let group = groups.entry(v).or_default();
            let id = match group
                .iter()
                .find(|(existing, _)| 1.0 - existing.dot(normal) < NORMAL_MATCH)
            {
                Some(&(_, id)) => id,
                None => {
                    let id = out.add_vertex(mesh.vertex(v));
                    normals.push(normal);
                    group.push((normal, id));
                    id
                }
            };
            corners[k] = id;
        }
        out.add_triangle(corners[0], corners[1], corners[2]);
    }

    out.set_normals(normals);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{create_cube, create_cylinder};

    #[test]
    fn test_without_split_angle_keeps_vertices() {
        let cube = create_cube(DVec3::splat(1.0), true).unwrap();
        let smooth = split_normals(&cube, None);
        assert_eq!(smooth.vertex_count(), 8);
        assert_eq!(smooth.normals().map(<[DVec3]>::len), Some(8));
    }

    #[test]
    fn test_cylinder_splits_only_at_cap_rims() {
        let segments = 32;
        let cylinder = create_cylinder(1.0, 0.5, 0.5, true, segments).unwrap();
        let split = split_normals(&cylinder, Some(30f64.to_radians()));
        // Each rim vertex gets one smooth side normal and one cap normal
        assert_eq!(split.vertex_count(), 4 * segments as usize);
        assert_eq!(split.triangle_count(), cylinder.triangle_count());
    }

    #[test]
    fn test_split_normals_preserve_volume() {
        let cube = create_cube(DVec3::splat(2.0), true).unwrap();
        let split = split_normals(&cube, Some(0.5));
        assert!((split.signed_volume() - cube.signed_volume()).abs() < 1e-12);
    }
}

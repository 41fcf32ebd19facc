//! # Vertex Welding
//!
//! Collapses vertices closer than a distance into one shared vertex, then
//! drops triangles that became degenerate and vertices nothing references.
//! This closes seams between separately generated parts after a merge.

use std::collections::HashMap;

use crate::mesh::Mesh;
use glam::DVec3;

/// Outcome of a weld pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// Vertices folded into another vertex.
    pub merged_vertices: usize,
    /// Triangles removed because two corners collapsed together.
    pub removed_triangles: usize,
    /// Vertices dropped because no triangle referenced them.
    pub removed_unused: usize,
}

type Cell = (i64, i64, i64);

/// Welds all vertices of `mesh` that lie within `distance` of each other.
///
/// Vertices are visited in index order. Each one snaps to the nearest
/// already-kept vertex within `distance`, or becomes a kept vertex itself,
/// so the result is deterministic. Colors and normals are dropped.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use rdwc_mesh::{Mesh, ops::weld_vertices};
///
/// let mut mesh = Mesh::new();
/// let a = mesh.add_vertex(DVec3::ZERO);
/// let b = mesh.add_vertex(DVec3::X);
/// let c = mesh.add_vertex(DVec3::Y);
/// let d = mesh.add_vertex(DVec3::new(1.0005, 0.0, 0.0));
/// let e = mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
/// mesh.add_triangle(a, b, c);
/// mesh.add_triangle(d, e, c);
///
/// let (welded, report) = weld_vertices(&mesh, 0.001);
/// assert_eq!(welded.vertex_count(), 4);
/// assert_eq!(report.merged_vertices, 1);
/// ```
pub fn weld_vertices(mesh: &Mesh, distance: f64) -> (Mesh, WeldReport) {
    let mut report = WeldReport::default();
    if distance.is_nan() || distance <= 0.0 || mesh.vertex_count() == 0 {
        return (mesh.clone(), report);
    }

    let cell_of = |v: DVec3| -> Cell {
        let c = (v / distance).floor();
        (c.x as i64, c.y as i64, c.z as i64)
    };

    let mut grid: HashMap<Cell, Vec<u32>> = HashMap::new();
    let mut kept: Vec<DVec3> = Vec::new();
    let mut remap: Vec<u32> = Vec::with_capacity(mesh.vertex_count());
    let limit = distance * distance;

    for &v in mesh.vertices() {
        let (cx, cy, cz) = cell_of(v);
        let mut best: Option<(u32, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &id in candidates {
                        let d2 = kept[id as usize].distance_squared(v);
                        let closer = best.map_or(true, |(best_id, best_d2)| {
                            d2 < best_d2 || (d2 == best_d2 && id < best_id)
                        });
                        if d2 <= limit && closer {
                            best = Some((id, d2));
                        }
                    }
                }
            }
        }

        match best {
            Some((id, _)) => {
                remap.push(id);
                report.merged_vertices += 1;
            }
            None => {
                let id = kept.len() as u32;
                kept.push(v);
                grid.entry((cx, cy, cz)).or_default().push(id);
                remap.push(id);
            }
        }
    }

    let mut triangles = Vec::with_capacity(mesh.triangle_count());
    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| remap[i as usize]);
        if a == b || b == c || a == c {
            report.removed_triangles += 1;
        } else {
            triangles.push([a, b, c]);
        }
    }

    // Compact away vertices no surviving triangle uses
    let mut used = vec![u32::MAX; kept.len()];
    let mut vertices = Vec::with_capacity(kept.len());
    for tri in &mut triangles {
        for corner in tri.iter_mut() {
            let slot = &mut used[*corner as usize];
            if *slot == u32::MAX {
                *slot = vertices.len() as u32;
                vertices.push(kept[*corner as usize]);
            }
            *corner = *slot;
        }
    }
    report.removed_unused = kept.len() - vertices.len();

    (Mesh::from_parts(vertices, triangles), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;

    #[test]
    fn test_weld_merges_close_vertices() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::Y);
        let d = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0009));
        let e = mesh.add_vertex(DVec3::new(-1.0, 0.0, 0.0));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(d, c, e);

        let (welded, report) = weld_vertices(&mesh, 0.001);

        assert_eq!(report.merged_vertices, 1);
        assert_eq!(welded.vertex_count(), 4);
        // Both triangles now share the origin vertex
        assert_eq!(welded.triangle(0)[0], welded.triangle(1)[0]);
    }

    #[test]
    fn test_weld_keeps_distant_vertices() {
        let mesh = create_cube(DVec3::splat(0.01), true).unwrap();
        let (welded, report) = weld_vertices(&mesh, 0.001);
        assert_eq!(report, WeldReport::default());
        assert_eq!(welded.vertex_count(), 8);
        assert_eq!(welded.triangle_count(), 12);
    }

    #[test]
    fn test_weld_removes_collapsed_triangles_and_unused_vertices() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::new(0.0002, 0.0, 0.0));
        let c = mesh.add_vertex(DVec3::Y);
        mesh.add_triangle(a, b, c);

        let (welded, report) = weld_vertices(&mesh, 0.001);

        assert_eq!(report.removed_triangles, 1);
        assert_eq!(report.removed_unused, 2);
        assert!(welded.is_empty());
        assert_eq!(welded.vertex_count(), 0);
    }

    #[test]
    fn test_weld_non_positive_distance_is_noop() {
        let mesh = create_cube(DVec3::splat(1.0), true).unwrap();
        let (welded, report) = weld_vertices(&mesh, 0.0);
        assert_eq!(welded, mesh);
        assert_eq!(report, WeldReport::default());
    }
}

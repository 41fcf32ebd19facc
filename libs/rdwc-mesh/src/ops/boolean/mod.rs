//! # Boolean Operations (CSG)
//!
//! Constructive Solid Geometry operations using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); A.build(B)
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); A.build(B); A.invert()
//!
//! Inputs must be closed meshes. Results are re-indexed with exact-duplicate
//! vertices shared, but T-junctions from polygon splitting remain; the
//! finalization weld closes those.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use rdwc_mesh::ops::boolean::union;
//! use rdwc_mesh::primitives::create_cube;
//!
//! let a = create_cube(DVec3::splat(1.0), false).unwrap();
//! let mut b = create_cube(DVec3::splat(1.0), false).unwrap();
//! b.translate(DVec3::splat(0.5));
//! let joined = union(&a, &b).unwrap();
//! assert!(joined.signed_volume() > 1.0);
//! ```

mod bsp;
mod plane;
mod polygon;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};
use crate::Mesh;
use bsp::BspTree;
use config::constants::{MAX_BOOLEAN_POLYGONS, VERTEX_MERGE_EPSILON};
use glam::DVec3;
use polygon::Polygon;

/// Squared doubled-area below which a fan triangle is treated as collinear.
const SLIVER_AREA_SQUARED: f64 = 1e-24;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Compute union of two meshes.
///
/// ## Parameters
///
/// - `a`: First mesh
/// - `b`: Second mesh
///
/// ## Returns
///
/// New mesh enclosing the volume of both inputs.
pub fn union(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(b.clone());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut tree_a = BspTree::new(polys_a)?;
    let mut tree_b = BspTree::new(polys_b)?;

    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons())?;

    polygons_to_mesh(&tree_a.all_polygons())
}

/// Compute difference of two meshes (A - B).
///
/// ## Parameters
///
/// - `a`: Base mesh
/// - `b`: Mesh to subtract
///
/// ## Returns
///
/// New mesh enclosing the volume of A that is not in B.
pub fn difference(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(Mesh::new());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut tree_a = BspTree::new(polys_a)?;
    let mut tree_b = BspTree::new(polys_b)?;

    // A - B = ~(~A | B)
    tree_a.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons())?;
    tree_a.invert();

    polygons_to_mesh(&tree_a.all_polygons())
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Convert mesh triangles to polygons, skipping degenerate ones.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    (0..mesh.triangle_count())
        .filter_map(|i| Polygon::from_vertices(mesh.triangle_positions(i).to_vec()))
        .collect()
}

/// Convert polygons back to an indexed mesh.
///
/// Vertices are shared when they quantize to the same
/// [`VERTEX_MERGE_EPSILON`] cell; polygons are fan-triangulated and
/// zero-area fan triangles (from collinear split points) are dropped.
fn polygons_to_mesh(polygons: &[Polygon]) -> MeshResult<Mesh> {
    if polygons.len() > MAX_BOOLEAN_POLYGONS {
        return Err(MeshError::boolean_failed(format!(
            "result has {} polygons (max: {MAX_BOOLEAN_POLYGONS})",
            polygons.len()
        )));
    }

    let mut mesh = Mesh::new();
    let mut index: HashMap<(i64, i64, i64), u32> = HashMap::new();

    for polygon in polygons {
        if polygon.vertices.iter().any(|v| !v.is_finite()) {
            return Err(MeshError::boolean_failed("non-finite vertex in result"));
        }

        let ids: Vec<u32> = polygon
            .vertices
            .iter()
            .map(|v| {
                *index
                    .entry(quantize(*v))
                    .or_insert_with(|| mesh.add_vertex(*v))
            })
            .collect();

        for i in 1..ids.len().saturating_sub(1) {
            let tri = [ids[0], ids[i], ids[i + 1]];
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                continue;
            }
            let [a, b, c] = tri.map(|id| mesh.vertex(id));
            if (b - a).cross(c - a).length_squared() < SLIVER_AREA_SQUARED {
                continue;
            }
            mesh.add_triangle(tri[0], tri[1], tri[2]);
        }
    }

    Ok(mesh)
}

fn quantize(v: DVec3) -> (i64, i64, i64) {
    let q = (v / VERTEX_MERGE_EPSILON).round();
    (q.x as i64, q.y as i64, q.z as i64)
}

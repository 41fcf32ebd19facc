//! # Cube Primitive
//!
//! Generates mesh for boxes (rectangular prisms).

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;

/// Creates a box mesh.
///
/// # Arguments
///
/// * `size` - Dimensions [x, y, z]
/// * `center` - If true, center at origin; if false, corner at origin
///
/// # Returns
///
/// A mesh with 8 vertices and 12 triangles (2 per face).
///
/// # Example
///
/// ```rust
/// use rdwc_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let mesh = create_cube(DVec3::new(0.2, 0.1, 0.05), true).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_cube(size: DVec3, center: bool) -> MeshResult<Mesh> {
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Box size must be positive: {size:?}"
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 12);

    let (min, max) = if center {
        let half = size / 2.0;
        (-half, half)
    } else {
        (DVec3::ZERO, size)
    };

    // Bottom face (z = min.z)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z));
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z));
    // Top face (z = max.z)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    // Counter-clockwise seen from outside
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);
    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);
    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);
    mesh.add_triangle(v2, v3, v7);
    mesh.add_triangle(v2, v7, v6);
    mesh.add_triangle(v3, v0, v4);
    mesh.add_triangle(v3, v4, v7);
    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);

    Ok(mesh)
}

//! # Torus Primitive
//!
//! Ring-shaped solids used for nuts, float collars and socket beads.

use super::check_segments;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::TAU;

/// Creates a torus around the Z axis.
///
/// ## Parameters
///
/// - `major_radius`: distance from the Z axis to the tube center
/// - `minor_radius`: tube radius, strictly smaller than `major_radius`
/// - `major_segments`: segments around Z
/// - `minor_segments`: segments around the tube
///
/// ## Example
///
/// ```rust
/// use rdwc_mesh::primitives::create_torus;
///
/// let ring = create_torus(0.05, 0.01, 24, 8).unwrap();
/// assert_eq!(ring.vertex_count(), 24 * 8);
/// assert!(ring.is_closed());
/// ```
pub fn create_torus(
    major_radius: f64,
    minor_radius: f64,
    major_segments: u32,
    minor_segments: u32,
) -> MeshResult<Mesh> {
    if !(minor_radius.is_finite() && major_radius.is_finite())
        || minor_radius <= 0.0
        || major_radius <= minor_radius
    {
        return Err(MeshError::degenerate(format!(
            "Torus needs 0 < minor < major radius: major={major_radius}, minor={minor_radius}"
        )));
    }
    check_segments("Torus", major_segments)?;
    check_segments("Torus", minor_segments)?;

    let (m, n) = (major_segments as usize, minor_segments as usize);
    let mut mesh = Mesh::with_capacity(m * n, 2 * m * n);

    for i in 0..m {
        let u = TAU * i as f64 / m as f64;
        for j in 0..n {
            let v = TAU * j as f64 / n as f64;
            let reach = major_radius + minor_radius * v.cos();
            mesh.add_vertex(DVec3::new(reach * u.cos(), reach * u.sin(), minor_radius * v.sin()));
        }
    }

    let index = |i: usize, j: usize| ((i % m) * n + (j % n)) as u32;
    for i in 0..m {
        for j in 0..n {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }

    Ok(mesh)
}

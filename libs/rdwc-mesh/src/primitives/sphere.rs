//! # Sphere Primitive
//!
//! Generates mesh for spheres using latitude/longitude tessellation.

use super::check_segments;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Creates a sphere mesh centered at the origin.
///
/// # Algorithm
///
/// - num_rings = (segments + 1) / 2
/// - Each ring at polar angle phi = 180° * (i + 0.5) / num_rings
/// - No pole vertices; the first and last rings are closed by polygon caps
///
/// # Example
///
/// ```rust
/// use rdwc_mesh::primitives::create_sphere;
///
/// let ball = create_sphere(0.02, 16).unwrap();
/// assert_eq!(ball.vertex_count(), 8 * 16);
/// ```
pub fn create_sphere(radius: f64, segments: u32) -> MeshResult<Mesh> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Sphere radius must be positive: {radius}"
        )));
    }

    check_segments("Sphere", segments)?;

    let num_rings = ((segments + 1) / 2).max(2) as usize;
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(num_rings * n, 2 * num_rings * n);

    let rings: Vec<Vec<u32>> = (0..num_rings)
        .map(|i| {
            let phi = PI * (i as f64 + 0.5) / num_rings as f64;
            let ring_radius = radius * phi.sin();
            let z = radius * phi.cos();
            (0..n)
                .map(|j| {
                    let theta = TAU * j as f64 / n as f64;
                    mesh.add_vertex(DVec3::new(
                        ring_radius * theta.cos(),
                        ring_radius * theta.sin(),
                        z,
                    ))
                })
                .collect()
        })
        .collect();

    // Top cap
    let first = &rings[0];
    for j in 1..n - 1 {
        mesh.add_triangle(first[0], first[j], first[j + 1]);
    }

    // Bands between adjacent rings
    for pair in rings.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..n {
            let j_next = (j + 1) % n;
            mesh.add_triangle(upper[j], lower[j], lower[j_next]);
            mesh.add_triangle(upper[j], lower[j_next], upper[j_next]);
        }
    }

    // Bottom cap
    let last = &rings[num_rings - 1];
    for j in 1..n - 1 {
        mesh.add_triangle(last[0], last[j + 1], last[j]);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_sphere_closed_and_outward() {
        let mesh = create_sphere(1.0, 24).unwrap();
        assert!(mesh.is_closed());
        assert!(mesh.validate());
        let volume = mesh.signed_volume();
        assert!(volume > 0.0);
        assert!(volume < 4.0 / 3.0 * PI);
    }

    #[test]
    fn test_sphere_bounds() {
        let mesh = create_sphere(0.5, 16).unwrap();
        let (min, max) = mesh.bounding_box();
        assert!(max.max_element() <= 0.5 + 1e-12);
        assert!(min.min_element() >= -0.5 - 1e-12);
    }

    #[test]
    fn test_sphere_invalid_input() {
        assert!(create_sphere(0.0, 16).is_err());
        assert!(create_sphere(1.0, 2).is_err());
    }
}

//! # Cylinder Primitive
//!
//! Generates mesh for cylinders and cone frustums along the Z axis.

use super::check_segments;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::TAU;

/// Creates a cylinder, cone or frustum mesh.
///
/// # Arguments
///
/// * `height` - Height along Z axis
/// * `radius_bottom` - Radius at the low end
/// * `radius_top` - Radius at the high end
/// * `center` - If true, center vertically at origin
/// * `segments` - Number of segments around circumference
///
/// # Example
///
/// ```rust
/// use rdwc_mesh::primitives::create_cylinder;
///
/// // 25 mm pipe, 1 m long
/// let pipe = create_cylinder(1.0, 0.0125, 0.0125, true, 32).unwrap();
/// assert_eq!(pipe.vertex_count(), 64);
///
/// // Nozzle cone
/// let cone = create_cylinder(0.02, 0.006, 0.0, true, 16).unwrap();
/// assert_eq!(cone.vertex_count(), 17);
/// ```
pub fn create_cylinder(
    height: f64,
    radius_bottom: f64,
    radius_top: f64,
    center: bool,
    segments: u32,
) -> MeshResult<Mesh> {
    if !height.is_finite() || height <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Cylinder height must be positive: {height}"
        )));
    }

    if !(radius_bottom.is_finite() && radius_top.is_finite())
        || radius_bottom < 0.0
        || radius_top < 0.0
    {
        return Err(MeshError::degenerate(format!(
            "Cylinder radii must be non-negative: r1={radius_bottom}, r2={radius_top}"
        )));
    }

    if radius_bottom == 0.0 && radius_top == 0.0 {
        return Err(MeshError::degenerate(
            "Cylinder must have at least one non-zero radius",
        ));
    }

    check_segments("Cylinder", segments)?;

    let mut mesh = Mesh::with_capacity(2 * segments as usize, 4 * segments as usize);

    let (z_bottom, z_top) = if center {
        (-height / 2.0, height / 2.0)
    } else {
        (0.0, height)
    };

    let ring = |mesh: &mut Mesh, radius: f64, z: f64| -> Vec<u32> {
        if radius > 0.0 {
            (0..segments)
                .map(|j| {
                    let theta = TAU * j as f64 / segments as f64;
                    mesh.add_vertex(DVec3::new(radius * theta.cos(), radius * theta.sin(), z))
                })
                .collect()
        } else {
            // Apex
            vec![mesh.add_vertex(DVec3::new(0.0, 0.0, z))]
        }
    };

    let bottom = ring(&mut mesh, radius_bottom, z_bottom);
    let top = ring(&mut mesh, radius_top, z_top);
    let n = segments as usize;

    if radius_bottom > 0.0 && radius_top > 0.0 {
        for j in 0..n {
            let j_next = (j + 1) % n;
            mesh.add_triangle(bottom[j], bottom[j_next], top[j_next]);
            mesh.add_triangle(bottom[j], top[j_next], top[j]);
        }
    } else if radius_bottom > 0.0 {
        let apex = top[0];
        for j in 0..n {
            mesh.add_triangle(bottom[j], bottom[(j + 1) % n], apex);
        }
    } else {
        let apex = bottom[0];
        for j in 0..n {
            mesh.add_triangle(apex, top[(j + 1) % n], top[j]);
        }
    }

    if radius_bottom > 0.0 {
        for j in 1..n - 1 {
            mesh.add_triangle(bottom[0], bottom[j + 1], bottom[j]);
        }
    }

    if radius_top > 0.0 {
        for j in 1..n - 1 {
            mesh.add_triangle(top[0], top[j], top[j + 1]);
        }
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_cylinder_centered() {
        let mesh = create_cylinder(2.0, 0.5, 0.5, true, 32).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.z, -1.0);
        assert_relative_eq!(max.z, 1.0);
        assert!(mesh.validate());
    }

    #[test]
    fn test_cylinder_closed_with_prism_volume() {
        let segments = 48;
        let mesh = create_cylinder(1.0, 0.5, 0.5, true, segments).unwrap();
        assert!(mesh.is_closed());
        // Inscribed polygon area times height
        let n = segments as f64;
        let expected = 0.5 * n * 0.25 * (2.0 * PI / n).sin();
        assert_relative_eq!(mesh.signed_volume(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_and_inverted_cone_are_closed() {
        let cone = create_cylinder(1.0, 0.5, 0.0, true, 16).unwrap();
        let inverted = create_cylinder(1.0, 0.0, 0.5, true, 16).unwrap();
        assert!(cone.is_closed());
        assert!(inverted.is_closed());
        assert!(cone.signed_volume() > 0.0);
        assert!(inverted.signed_volume() > 0.0);
    }

    #[test]
    fn test_frustum_is_closed() {
        let mesh = create_cylinder(0.3, 0.2, 0.1, true, 24).unwrap();
        assert!(mesh.is_closed());
        assert_eq!(mesh.vertex_count(), 48);
    }

    #[test]
    fn test_cylinder_invalid_input() {
        assert!(create_cylinder(0.0, 1.0, 1.0, true, 16).is_err());
        assert!(create_cylinder(1.0, -1.0, 1.0, true, 16).is_err());
        assert!(create_cylinder(1.0, 0.0, 0.0, true, 16).is_err());
        assert!(create_cylinder(1.0, 1.0, 1.0, true, 2).is_err());
    }
}

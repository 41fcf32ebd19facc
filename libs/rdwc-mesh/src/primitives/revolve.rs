//! # Revolved Profile
//!
//! Lathe primitive: a closed 2D profile in the (radius, z) half-plane swept
//! a full turn around the Z axis. Vessels with walls, rims and lids are
//! generated this way as a single closed solid.

use super::check_segments;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::{DVec2, DVec3};
use std::f64::consts::TAU;

/// Revolves a closed profile around the Z axis.
///
/// ## Parameters
///
/// - `profile`: simple polygon of `(radius, z)` points with `radius >= 0`.
///   Points on the axis (`radius == 0`) become single pole vertices; an edge
///   running along the axis produces no faces. Either winding is accepted.
/// - `segments`: number of angular steps
///
/// ## Returns
///
/// A closed mesh with outward-facing triangles.
///
/// ## Example
///
/// ```rust
/// use glam::DVec2;
/// use rdwc_mesh::primitives::create_revolved;
///
/// // A solid cylinder of radius 1 and height 1
/// let profile = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let mesh = create_revolved(&profile, 16).unwrap();
/// assert!(mesh.is_closed());
/// assert!(mesh.signed_volume() > 0.0);
/// ```
pub fn create_revolved(profile: &[DVec2], segments: u32) -> MeshResult<Mesh> {
    check_segments("Revolve", segments)?;

    if profile.len() < 3 {
        return Err(MeshError::degenerate(format!(
            "Revolve profile needs at least 3 points, got {}",
            profile.len()
        )));
    }

    if profile.iter().any(|p| !p.is_finite() || p.x < 0.0) {
        return Err(MeshError::degenerate(
            "Revolve profile must be finite and lie at radius >= 0",
        ));
    }

    let area = signed_area(profile);
    if area.abs() < EPSILON {
        return Err(MeshError::degenerate("Revolve profile has zero area"));
    }

    // Counter-clockwise in (r, z) gives outward normals below
    let ordered: Vec<DVec2> = if area > 0.0 {
        profile.to_vec()
    } else {
        profile.iter().rev().copied().collect()
    };

    let n = segments as usize;
    let mut mesh = Mesh::new();

    // One ring per profile point, or a single pole vertex on the axis
    let rings: Vec<Vec<u32>> = ordered
        .iter()
        .map(|p| {
            if p.x < EPSILON {
                vec![mesh.add_vertex(DVec3::new(0.0, 0.0, p.y))]
            } else {
                (0..n)
                    .map(|j| {
                        let theta = TAU * j as f64 / n as f64;
                        mesh.add_vertex(DVec3::new(p.x * theta.cos(), p.x * theta.sin(), p.y))
                    })
                    .collect()
            }
        })
        .collect();

    let at = |ring: &[u32], j: usize| ring[j % ring.len()];

    for i in 0..ordered.len() {
        let current = &rings[i];
        let next = &rings[(i + 1) % ordered.len()];
        for j in 0..n {
            let a = at(current, j);
            let b = at(next, j);
            let c = at(next, j + 1);
            let d = at(current, j + 1);
            for tri in [[a, c, b], [a, d, c]] {
                if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                    mesh.add_triangle(tri[0], tri[1], tri[2]);
                }
            }
        }
    }

    Ok(mesh)
}

/// Shoelace area of a 2D polygon; positive when counter-clockwise.
fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn cup_profile() -> Vec<DVec2> {
        // Open cup: floor, outer wall, lip, inner wall
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.9, 1.0),
            DVec2::new(0.9, 0.1),
            DVec2::new(0.0, 0.1),
        ]
    }

    #[test]
    fn test_revolved_cup_is_closed() {
        let mesh = create_revolved(&cup_profile(), 32).unwrap();
        assert!(mesh.is_closed());
        assert!(mesh.validate());
    }

    #[test]
    fn test_winding_is_normalized() {
        let forward = create_revolved(&cup_profile(), 32).unwrap();
        let reversed: Vec<DVec2> = cup_profile().into_iter().rev().collect();
        let backward = create_revolved(&reversed, 32).unwrap();
        assert!(forward.signed_volume() > 0.0);
        assert_relative_eq!(forward.signed_volume(), backward.signed_volume(), epsilon = 1e-12);
    }

    #[test]
    fn test_revolved_ring_volume() {
        // Rectangle away from the axis revolves into a tube wall
        let profile = [
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
        ];
        let mesh = create_revolved(&profile, 256).unwrap();
        assert!(mesh.is_closed());
        let analytic = PI * (4.0 - 1.0);
        assert_relative_eq!(mesh.signed_volume(), analytic, max_relative = 1e-3);
    }

    #[test]
    fn test_revolve_rejects_bad_profiles() {
        let line = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        assert!(create_revolved(&line, 16).is_err());
        let negative = [DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)];
        assert!(create_revolved(&negative, 16).is_err());
        assert!(create_revolved(&cup_profile(), 2).is_err());
    }
}

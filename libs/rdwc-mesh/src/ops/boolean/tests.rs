//! Tests for boolean operations on closed primitives.

use super::*;
use crate::primitives::{create_cube, create_cylinder};
use approx::assert_relative_eq;
use std::f64::consts::PI;

/// Axis-aligned cube of edge `size` centered at `pos`.
fn cube_at(pos: DVec3, size: f64) -> Mesh {
    let mut mesh = create_cube(DVec3::splat(size), true).unwrap();
    mesh.translate(pos);
    mesh
}

#[test]
fn test_union_non_overlapping() {
    let a = cube_at(DVec3::new(-2.0, 0.0, 0.0), 2.0);
    let b = cube_at(DVec3::new(2.0, 0.0, 0.0), 2.0);

    let result = union(&a, &b).unwrap();

    assert_relative_eq!(result.signed_volume(), 16.0, epsilon = 1e-9);
    let (min, max) = result.bounding_box();
    assert_relative_eq!(min.x, -3.0);
    assert_relative_eq!(max.x, 3.0);
}

#[test]
fn test_union_overlapping() {
    let a = cube_at(DVec3::ZERO, 1.0);
    let b = cube_at(DVec3::splat(0.5), 1.0);

    let result = union(&a, &b).unwrap();

    // 1 + 1 - 0.125 shared
    assert_relative_eq!(result.signed_volume(), 1.875, epsilon = 1e-9);
}

#[test]
fn test_union_with_empty_returns_other() {
    let a = cube_at(DVec3::ZERO, 1.0);
    let result = union(&Mesh::new(), &a).unwrap();
    assert_eq!(result, a);
}

#[test]
fn test_difference_hollows_cube() {
    let a = cube_at(DVec3::ZERO, 4.0);
    let b = cube_at(DVec3::ZERO, 2.0);

    let result = difference(&a, &b).unwrap();

    assert_relative_eq!(result.signed_volume(), 64.0 - 8.0, epsilon = 1e-9);
}

#[test]
fn test_difference_non_overlapping_keeps_base() {
    let a = cube_at(DVec3::new(-2.0, 0.0, 0.0), 2.0);
    let b = cube_at(DVec3::new(2.0, 0.0, 0.0), 2.0);

    let result = difference(&a, &b).unwrap();

    assert_relative_eq!(result.signed_volume(), 8.0, epsilon = 1e-9);
}

#[test]
fn test_difference_bore_through_block() {
    let block = cube_at(DVec3::ZERO, 1.0);
    let segments = 24;
    let bore = create_cylinder(2.0, 0.25, 0.25, true, segments).unwrap();

    let result = difference(&block, &bore).unwrap();

    let n = segments as f64;
    let bore_area = 0.5 * n * 0.0625 * (2.0 * PI / n).sin();
    assert_relative_eq!(result.signed_volume(), 1.0 - bore_area, epsilon = 1e-9);
    // The bore opens both faces, so the result reaches the same bounds
    let (min, max) = result.bounding_box();
    assert_relative_eq!(min.z, -0.5);
    assert_relative_eq!(max.z, 0.5);
}

#[test]
fn test_results_have_no_degenerate_triangles() {
    let a = cube_at(DVec3::ZERO, 1.0);
    let bore = create_cylinder(2.0, 0.3, 0.3, true, 16).unwrap();
    let result = difference(&a, &bore).unwrap();
    assert!(result.validate());
    assert!(!result.has_non_finite());
}

//! # Plane for BSP Operations
//!
//! Plane representation with point classification.

use config::constants::BSP_EPSILON;
use glam::DVec3;

/// Triangles whose doubled area is below this have no usable plane.
const DEGENERATE_AREA: f64 = 1e-14;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Bit flags describing where a point or polygon lies relative to a plane.
///
/// Polygon classification is the bitwise OR of its vertices' flags, so a
/// polygon with vertices on both sides comes out as [`SPANNING`].
pub type Side = u8;

/// On the plane (within [`BSP_EPSILON`]).
pub const COPLANAR: Side = 0;
/// In front of the plane (positive side).
pub const FRONT: Side = 1;
/// Behind the plane (negative side).
pub const BACK: Side = 2;
/// Vertices on both sides.
pub const SPANNING: Side = FRONT | BACK;

// =============================================================================
// PLANE
// =============================================================================

/// A plane in 3D space defined by unit normal and distance from origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Create plane from normal and distance.
    pub fn new(normal: DVec3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Create plane from three counter-clockwise points.
    ///
    /// Returns `None` for degenerate (collinear) input.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        let length = n.length();
        if !length.is_finite() || length < DEGENERATE_AREA {
            return None;
        }
        let normal = n / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Get the plane normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Get the plane distance.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Reverse the plane orientation.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance from point to plane.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point relative to this plane.
    pub fn classify_point(&self, point: DVec3) -> Side {
        let dist = self.signed_distance(point);
        if dist > BSP_EPSILON {
            FRONT
        } else if dist < -BSP_EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap();
        assert_eq!(plane.normal(), DVec3::Z);
        assert_eq!(plane.w(), 0.0);
    }

    #[test]
    fn test_plane_from_collinear_points() {
        assert!(Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_plane_classify_point() {
        let plane = Plane::new(DVec3::Z, 0.0);
        assert_eq!(plane.classify_point(DVec3::Z), FRONT);
        assert_eq!(plane.classify_point(-DVec3::Z), BACK);
        assert_eq!(plane.classify_point(DVec3::new(1.0, 1.0, 1e-9)), COPLANAR);
    }

    #[test]
    fn test_plane_flip() {
        let mut plane = Plane::new(DVec3::Z, 5.0);
        plane.flip();
        assert_eq!(plane.normal(), -DVec3::Z);
        assert_eq!(plane.w(), -5.0);
    }
}

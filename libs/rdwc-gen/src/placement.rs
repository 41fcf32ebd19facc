//! # Placement
//!
//! Rigid placements, socket ports and the connection arithmetic that makes
//! every pipe seat flush: a pipe between two ports starts and ends exactly
//! on the socket mouths, pushed back only by the configured insertion depth.

use std::f64::consts::TAU;

use crate::dims::{FittingGeometry, FittingKind};
use crate::settings::{LayoutConfig, LayoutType};
use config::constants::MIN_PIPE_LENGTH;
use glam::{DMat3, DMat4, DQuat, DVec3};

/// Location and orientation of a part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub location: DVec3,
    pub rotation: DQuat,
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(DVec3::ZERO)
    }
}

impl Placement {
    /// Unrotated placement at a location.
    pub fn at(location: DVec3) -> Self {
        Self {
            location,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Placement from XYZ Euler angles in radians.
    ///
    /// Rotations are extrinsic: X first, then Y, then Z.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec3;
    /// use rdwc_gen::placement::Placement;
    /// use std::f64::consts::PI;
    ///
    /// let turned = Placement::from_euler(DVec3::ZERO, DVec3::new(0.0, 0.0, PI));
    /// let x = turned.transform_vector(DVec3::X);
    /// assert!((x - DVec3::NEG_X).length() < 1e-12);
    /// ```
    pub fn from_euler(location: DVec3, euler: DVec3) -> Self {
        let rotation = DQuat::from_rotation_z(euler.z)
            * DQuat::from_rotation_y(euler.y)
            * DQuat::from_rotation_x(euler.x);
        Self { location, rotation }
    }

    /// Placement whose local X and Y axes map onto the given directions.
    ///
    /// `x_axis` and `y_axis` must be orthogonal; both are normalized.
    pub fn from_basis(location: DVec3, x_axis: DVec3, y_axis: DVec3) -> Self {
        let x = x_axis.normalize();
        let y = y_axis.normalize();
        let z = x.cross(y);
        Self {
            location,
            rotation: DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize(),
        }
    }

    /// Placement whose local Z axis points along `direction`.
    pub fn along(location: DVec3, direction: DVec3) -> Self {
        Self {
            location,
            rotation: DQuat::from_rotation_arc(DVec3::Z, direction.normalize()),
        }
    }

    /// Rigid transform matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.location)
    }

    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.location + self.rotation * point
    }

    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }
}

// =============================================================================
// PORTS & SPANS
// =============================================================================

/// A socket mouth: the point a pipe end must touch, and the outward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub position: DVec3,
    /// Unit vector pointing out of the socket.
    pub direction: DVec3,
}

impl Port {
    pub fn new(position: DVec3, direction: DVec3) -> Self {
        Self {
            position,
            direction: direction.normalize(),
        }
    }
}

/// World ports of a fitting, in the order of [`FittingKind::socket_axes`].
pub fn fitting_ports(geometry: &FittingGeometry, placement: &Placement) -> Vec<Port> {
    let offset = geometry.connection_offset();
    geometry
        .kind
        .socket_axes()
        .iter()
        .map(|axis| {
            Port::new(
                placement.transform_point(*axis * offset),
                placement.transform_vector(*axis),
            )
        })
        .collect()
}

/// Returns the port whose outward axis best matches `direction`.
pub fn port_facing(ports: &[Port], direction: DVec3) -> Option<Port> {
    let direction = direction.normalize();
    ports
        .iter()
        .copied()
        .filter(|port| port.direction.dot(direction) > 0.5)
        .max_by(|a, b| a.direction.dot(direction).total_cmp(&b.direction.dot(direction)))
}

/// The exact segment a pipe occupies between two ports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: DVec3,
    pub end: DVec3,
}

impl Span {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    pub fn midpoint(&self) -> DVec3 {
        (self.start + self.end) / 2.0
    }
}

/// Computes the pipe between two ports.
///
/// Each end sits on its mouth, pushed back into the socket by `insertion`.
/// Returns `None` when the ends coincide or when the mouths already touch
/// or overlap, so no pipe would fit between them.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rdwc_gen::placement::{connection_span, Port};
///
/// let a = Port::new(DVec3::new(0.035, 0.0, 0.0), DVec3::X);
/// let b = Port::new(DVec3::new(0.565, 0.0, 0.0), DVec3::NEG_X);
/// let span = connection_span(&a, &b, 0.0).unwrap();
/// assert!((span.length() - 0.53).abs() < 1e-12);
/// ```
pub fn connection_span(a: &Port, b: &Port, insertion: f64) -> Option<Span> {
    // Fit is decided mouth to mouth; insertion only lengthens the pipe
    let gap = b.position - a.position;
    if gap.length() < MIN_PIPE_LENGTH || gap.dot(a.direction) <= 0.0 {
        return None;
    }
    Some(Span {
        start: a.position - a.direction * insertion,
        end: b.position - b.direction * insertion,
    })
}

// =============================================================================
// LAYOUT GEOMETRY
// =============================================================================

/// Center of every pot on the floor plane (z = 0).
///
/// GRID is row-major, LINEAR is one row of `columns` pots along X and
/// CIRCULAR spreads `rows × columns` pots evenly around the origin.
///
/// # Example
///
/// ```rust
/// use rdwc_gen::placement::pot_positions;
/// use rdwc_gen::settings::{LayoutConfig, LayoutType};
///
/// let layout = LayoutConfig {
///     layout_type: LayoutType::Linear,
///     columns: 3,
///     ..LayoutConfig::default()
/// };
/// let positions = pot_positions(&layout);
/// assert_eq!(positions.len(), 3);
/// assert!(positions.iter().all(|p| p.y == 0.0));
/// ```
pub fn pot_positions(layout: &LayoutConfig) -> Vec<DVec3> {
    match layout.layout_type {
        LayoutType::Grid => (0..layout.rows)
            .flat_map(|r| {
                (0..layout.columns).map(move |c| {
                    DVec3::new(
                        c as f64 * layout.spacing_x,
                        r as f64 * layout.spacing_y,
                        0.0,
                    )
                })
            })
            .collect(),
        LayoutType::Linear => (0..layout.columns)
            .map(|c| DVec3::new(c as f64 * layout.spacing_x, 0.0, 0.0))
            .collect(),
        LayoutType::Circular => {
            let count = layout.rows * layout.columns;
            (0..count)
                .map(|i| {
                    let angle = i as f64 * TAU / count as f64;
                    DVec3::new(
                        layout.circle_radius * angle.cos(),
                        layout.circle_radius * angle.sin(),
                        0.0,
                    )
                })
                .collect()
        }
    }
}

/// Height of the pipe plane at a horizontal distance from the system center.
///
/// The base height is a percentage of the pot height; a slope in degrees
/// tilts the plane so water runs toward the lower end.
pub fn pipe_height(
    pot_height: f64,
    height_percent: f64,
    slope_degrees: f64,
    distance_from_center: f64,
) -> f64 {
    let base = pot_height * height_percent / 100.0;
    if slope_degrees == 0.0 {
        return base;
    }
    base + distance_from_center * slope_degrees.to_radians().tan()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dims::PipeSpec;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn tee_geometry() -> FittingGeometry {
        let pipe = PipeSpec::from_diameter(0.025).unwrap();
        FittingGeometry::for_kind(FittingKind::Tee, &pipe)
    }

    #[test]
    fn test_round_trip_pipe_length() {
        let g = tee_geometry();
        let d = g.connection_offset();
        for distance in [0.2, 0.6, 1.0, 2.5] {
            let a = fitting_ports(&g, &Placement::at(DVec3::ZERO));
            let b = fitting_ports(&g, &Placement::at(DVec3::new(distance, 0.0, 0.0)));
            let span = connection_span(&a[0], &b[1], 0.0).unwrap();
            assert_relative_eq!(span.length(), distance - 2.0 * d, epsilon = 1e-12);
            assert!(span.direction().abs_diff_eq(DVec3::X, 1e-12));
        }
    }

    #[test]
    fn test_no_pipe_when_mouths_touch_or_overlap() {
        let g = tee_geometry();
        let d = g.connection_offset();
        for distance in [2.0 * d, 2.0 * d - 0.01, d, 0.0] {
            let a = fitting_ports(&g, &Placement::at(DVec3::ZERO));
            let b = fitting_ports(&g, &Placement::at(DVec3::new(distance, 0.0, 0.0)));
            assert!(connection_span(&a[0], &b[1], 0.0).is_none(), "distance {distance}");
        }
    }

    #[test]
    fn test_overlapping_mouths_stay_empty_with_insertion() {
        // Mouths 5 mm past each other
        let a = Port::new(DVec3::new(0.035, 0.0, 0.0), DVec3::X);
        let b = Port::new(DVec3::new(0.030, 0.0, 0.0), DVec3::NEG_X);
        for insertion in [0.0, 0.01, 0.02] {
            assert!(connection_span(&a, &b, insertion).is_none(), "insertion {insertion}");
        }
        // Coincident mouths get no pipe either
        let c = Port::new(a.position, DVec3::NEG_X);
        assert!(connection_span(&a, &c, 0.01).is_none());
    }

    #[test]
    fn test_insertion_depth_lengthens_pipe() {
        let a = Port::new(DVec3::ZERO, DVec3::X);
        let b = Port::new(DVec3::new(1.0, 0.0, 0.0), DVec3::NEG_X);
        let span = connection_span(&a, &b, 0.01).unwrap();
        assert_relative_eq!(span.length(), 1.02, epsilon = 1e-12);
        assert_relative_eq!(span.start.x, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_rotated_tee_ports() {
        let g = tee_geometry();
        let placement = Placement::from_euler(DVec3::new(1.0, 2.0, 0.1), DVec3::new(0.0, 0.0, PI));
        let ports = fitting_ports(&g, &placement);
        let branch = port_facing(&ports, DVec3::NEG_Y).unwrap();
        assert!(branch
            .position
            .abs_diff_eq(DVec3::new(1.0, 2.0 - 0.035, 0.1), 1e-12));
        let west = port_facing(&ports, DVec3::NEG_X).unwrap();
        assert_relative_eq!(west.position.x, 1.0 - 0.035, epsilon = 1e-12);
    }

    #[test]
    fn test_from_basis_maps_axes() {
        let placement = Placement::from_basis(DVec3::ZERO, DVec3::Y, DVec3::NEG_X);
        assert!(placement.transform_vector(DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
        assert!(placement.transform_vector(DVec3::Y).abs_diff_eq(DVec3::NEG_X, 1e-12));
        assert!(placement.transform_vector(DVec3::Z).abs_diff_eq(DVec3::Z, 1e-12));
    }

    #[test]
    fn test_along_points_z() {
        for direction in [DVec3::X, DVec3::NEG_Z, DVec3::new(1.0, 1.0, 0.5)] {
            let placement = Placement::along(DVec3::ZERO, direction);
            let z = placement.transform_vector(DVec3::Z);
            assert!(z.abs_diff_eq(direction.normalize(), 1e-12));
        }
    }

    #[test]
    fn test_euler_order() {
        // X first, then Z: +Y -> +Z -> +Z
        let placement = Placement::from_euler(DVec3::ZERO, DVec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        assert!(placement.transform_vector(DVec3::Y).abs_diff_eq(DVec3::Z, 1e-12));
        assert!(placement.transform_vector(DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn test_circular_positions() {
        let layout = LayoutConfig {
            layout_type: LayoutType::Circular,
            rows: 1,
            columns: 6,
            circle_radius: 1.5,
            ..LayoutConfig::default()
        };
        let positions = pot_positions(&layout);
        assert_eq!(positions.len(), 6);
        for (i, p) in positions.iter().enumerate() {
            assert_relative_eq!(p.length(), 1.5, epsilon = 1e-6);
            let next = positions[(i + 1) % 6];
            let angle = p.angle_between(next);
            assert_relative_eq!(angle, PI / 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_grid_positions_row_major() {
        let layout = LayoutConfig {
            layout_type: LayoutType::Grid,
            rows: 2,
            columns: 3,
            spacing_x: 0.5,
            spacing_y: 0.7,
            ..LayoutConfig::default()
        };
        let positions = pot_positions(&layout);
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[4], DVec3::new(0.5, 0.7, 0.0));
    }

    #[test]
    fn test_pipe_height_with_slope() {
        assert_relative_eq!(pipe_height(0.4, 15.0, 0.0, 3.0), 0.06, epsilon = 1e-12);
        let sloped = pipe_height(0.4, 15.0, 45.0, 0.1);
        assert_relative_eq!(sloped, 0.16, epsilon = 1e-12);
    }
}

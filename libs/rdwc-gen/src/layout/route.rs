//! Orthogonal pipe runs with an elbow at every corner.

use crate::dims::FittingKind;
use crate::error::SceneError;
use crate::layout::Run;
use crate::placement::{Placement, Port};
use glam::DVec3;
use log::warn;

const POINT_EPSILON: f64 = 1e-9;

/// A run from one port through corner points to another port.
///
/// Consecutive points must differ along exactly one axis so every corner
/// is a right angle.
#[derive(Debug, Clone)]
pub(crate) struct Route {
    /// Prefix of the generated pipe and elbow names.
    pub prefix: String,
    pub from: Port,
    pub corners: Vec<DVec3>,
    pub to: Port,
    /// Inline fittings spread evenly along one leg, in flow order.
    pub inline: Vec<(FittingKind, String)>,
    pub inline_leg: usize,
}

impl Route {
    pub fn new(prefix: impl Into<String>, from: Port, corners: Vec<DVec3>, to: Port) -> Self {
        Self {
            prefix: prefix.into(),
            from,
            corners,
            to,
            inline: Vec::new(),
            inline_leg: 0,
        }
    }

    pub fn with_inline(mut self, leg: usize, inline: Vec<(FittingKind, String)>) -> Self {
        self.inline_leg = leg;
        self.inline = inline;
        self
    }

    /// Route points with duplicate and straight-through corners removed.
    fn points(&self) -> Vec<DVec3> {
        let mut points: Vec<DVec3> = Vec::with_capacity(self.corners.len() + 2);
        for p in std::iter::once(self.from.position)
            .chain(self.corners.iter().copied())
            .chain(std::iter::once(self.to.position))
        {
            if points.last().is_some_and(|last| last.distance(p) < POINT_EPSILON) {
                continue;
            }
            points.push(p);
        }

        let mut i = 1;
        while i + 1 < points.len() {
            let d_in = (points[i] - points[i - 1]).normalize();
            let d_out = (points[i + 1] - points[i]).normalize();
            if d_in.cross(d_out).length() < POINT_EPSILON {
                points.remove(i);
            } else {
                i += 1;
            }
        }
        points
    }
}

impl Run<'_> {
    /// Places the pipes, elbows and inline fittings of a route.
    pub fn route(&mut self, route: &Route) -> Result<(), SceneError> {
        let points = self.route_points(route);
        if points.len() < 2 {
            warn!("{}: route starts where it ends", route.prefix);
            return Ok(());
        }
        let legs = points.len() - 1;
        let inline_leg = route.inline_leg.min(legs - 1);
        let mut current = route.from;
        let mut pipes = 0;
        let pipe_name = |n: &mut usize| {
            *n += 1;
            format!("{}_Pipe_{}", route.prefix, *n - 1)
        };

        for leg in 0..legs {
            let (p, q) = (points[leg], points[leg + 1]);
            let dir = (q - p).normalize();

            if leg == inline_leg {
                let count = route.inline.len();
                for (k, (kind, name)) in route.inline.iter().enumerate() {
                    let center = p + (q - p) * (k + 1) as f64 / (count + 1) as f64;
                    let ports = self.fitting(*kind, name, &Placement::along(center, dir))?;
                    self.connect(&pipe_name(&mut pipes), &current, &ports[0])?;
                    current = ports[1];
                }
            }

            if leg + 1 < legs {
                let next = (points[leg + 2] - q).normalize();
                let name = format!("{}_Elbow_{}", route.prefix, leg);
                let ports =
                    self.fitting(FittingKind::Elbow, &name, &Placement::from_basis(q, -dir, next))?;
                self.connect(&pipe_name(&mut pipes), &current, &ports[0])?;
                current = ports[1];
            } else {
                self.connect(&pipe_name(&mut pipes), &current, &route.to)?;
            }
        }
        Ok(())
    }

    /// Route points with non-orthogonal corners dropped.
    fn route_points(&self, route: &Route) -> Vec<DVec3> {
        let mut points = route.points();
        let mut i = 1;
        while i + 1 < points.len() {
            let d_in = (points[i] - points[i - 1]).normalize();
            let d_out = (points[i + 1] - points[i]).normalize();
            if d_in.dot(d_out).abs() > 1e-6 {
                warn!(
                    "{}: corner at {} is not a right angle, running straight through",
                    route.prefix, points[i]
                );
                points.remove(i);
            } else {
                i += 1;
            }
        }
        points
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_drop_duplicates_and_straight_corners() {
        let route = Route::new(
            "Feed",
            Port::new(DVec3::ZERO, DVec3::X),
            vec![
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 1.0),
                DVec3::new(1.0, 0.0, 2.0),
                DVec3::new(1.0, 1.0, 2.0),
            ],
            Port::new(DVec3::new(1.0, 2.0, 2.0), DVec3::NEG_Y),
        );
        let points = route.points();
        assert_eq!(
            points,
            vec![
                DVec3::ZERO,
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 2.0),
                DVec3::new(1.0, 2.0, 2.0),
            ]
        );
    }
}

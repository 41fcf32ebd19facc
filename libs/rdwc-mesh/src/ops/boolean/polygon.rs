//! # Polygon for BSP Operations
//!
//! Convex polygon with plane and splitting support.

use super::plane::{Plane, BACK, COPLANAR, FRONT, SPANNING};
use glam::DVec3;

/// A convex polygon with its supporting plane.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order.
    pub vertices: Vec<DVec3>,
    /// Plane containing this polygon.
    pub plane: Plane,
}

impl Polygon {
    /// Create polygon from vertices, deriving the plane from the first three.
    ///
    /// Returns `None` if the vertices don't span a plane.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Reverse winding order and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Split this polygon by `plane` into the four output buckets.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back`
    /// depending on their facing. Spanning polygons are cut in two; the
    /// fragments keep the parent plane so slivers never lose orientation.
    pub fn split(
        self,
        plane: &Plane,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            let side = plane.classify_point(*v);
            polygon_type |= side;
            types.push(side);
        }

        match polygon_type {
            COPLANAR => {
                if plane.normal().dot(self.plane.normal()) > 0.0 {
                    coplanar_front.push(self);
                } else {
                    coplanar_back.push(self);
                }
            }
            FRONT => front.push(self),
            BACK => back.push(self),
            _ => {
                let n = self.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (plane.w() - plane.normal().dot(vi)) / plane.normal().dot(vj - vi);
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }

                if f.len() >= 3 {
                    front.push(Polygon {
                        vertices: f,
                        plane: self.plane,
                    });
                }
                if b.len() >= 3 {
                    back.push(Polygon {
                        vertices: b,
                        plane: self.plane,
                    });
                }
            }
        }
    }
}

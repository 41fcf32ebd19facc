//! # Mesh Data Structure
//!
//! Core mesh representation with vertices, triangles and optional normals.

use std::collections::HashMap;
use std::fmt::Write;

use config::constants::VERTEX_MERGE_EPSILON;
use glam::{DMat4, DVec3};

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64 internally. Lengths are meters.
///
/// # Example
///
/// ```rust
/// use rdwc_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
        }
    }

    /// Creates a mesh from raw vertex and triangle buffers.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            normals: None,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a mutable reference to the vertices.
    ///
    /// Topology is left untouched; cached normals are dropped.
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        self.normals = None;
        &mut self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the three corner positions of a triangle.
    #[inline]
    pub fn triangle_positions(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// Sets vertex normals.
    pub fn set_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = Some(normals);
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Computes area-weighted smooth normals for each vertex.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive for closed meshes whose triangles wind counter-clockwise
    /// when viewed from outside.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let a = self.vertices[tri[0] as usize];
                let b = self.vertices[tri[1] as usize];
                let c = self.vertices[tri[2] as usize];
                a.dot(b.cross(c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Returns true if every edge is shared by exactly two triangles with
    /// opposite orientation.
    pub fn is_closed(&self) -> bool {
        let mut edges: HashMap<(u32, u32), i32> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let (key, sign) = if a < b { ((a, b), 1) } else { ((b, a), -1) };
                *edges.entry(key).or_insert(0) += sign;
            }
        }
        !self.triangles.is_empty() && edges.values().all(|balance| *balance == 0)
    }

    /// Returns true if any vertex has a NaN or infinite coordinate.
    pub fn has_non_finite(&self) -> bool {
        self.vertices.iter().any(|v| !v.is_finite())
    }

    /// Transforms all vertices by a 4x4 matrix.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        // Normals use the inverse transpose
        if let Some(normals) = &mut self.normals {
            let normal_matrix = matrix.inverse().transpose();
            for n in normals {
                *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
            }
        }
    }

    /// Returns a transformed copy of this mesh.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let mut copy = self.clone();
        copy.transform(matrix);
        copy
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for tri in &other.triangles {
            self.triangles
                .push([tri[0] + offset, tri[1] + offset, tri[2] + offset]);
        }

        // Normals only stay valid when both sides have them
        self.normals = match (self.normals.take(), &other.normals) {
            (Some(mut own), Some(theirs)) => {
                own.extend_from_slice(theirs);
                Some(own)
            }
            _ => None,
        };
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (repeated index or zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let area = (v1 - v0).cross(v2 - v0).length();
            if area < VERTEX_MERGE_EPSILON * VERTEX_MERGE_EPSILON {
                return false;
            }
        }

        true
    }

    /// Appends this mesh as a Wavefront OBJ object.
    ///
    /// `index_base` is the number of vertices already written to `out`, so
    /// several meshes can share one file.
    pub fn write_obj(&self, out: &mut impl Write, name: &str, index_base: usize) -> std::fmt::Result {
        writeln!(out, "o {name}")?;
        for v in &self.vertices {
            writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
        }
        if let Some(normals) = &self.normals {
            for n in normals {
                writeln!(out, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            }
        }
        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| i as usize + index_base + 1);
            if self.normals.is_some() {
                writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(out, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    }

}

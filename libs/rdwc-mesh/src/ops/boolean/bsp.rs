//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Stack Safety
//!
//! Nodes live in a flat arena and every traversal uses an explicit work
//! list, so convex inputs (which degenerate into a single long chain of
//! back children) never recurse. Depth is still bounded by
//! [`MAX_BSP_DEPTH`]; deeper trees are reported as a boolean failure.

use super::plane::Plane;
use super::polygon::Polygon;
use crate::error::{MeshError, MeshResult};
use config::constants::MAX_BSP_DEPTH;

/// Index of a node inside the arena.
type NodeId = usize;

#[derive(Debug, Clone, Default)]
struct Node {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    depth: usize,
}

/// An arena-allocated BSP tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<Node>,
}

impl BspTree {
    /// Builds a tree from polygons.
    pub fn new(polygons: Vec<Polygon>) -> MeshResult<Self> {
        let mut tree = Self {
            nodes: vec![Node::default()],
        };
        tree.build(polygons)?;
        Ok(tree)
    }

    /// Inserts polygons into the existing tree, creating nodes as needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) -> MeshResult<()> {
        let mut work: Vec<(NodeId, Vec<Polygon>)> = vec![(0, polygons)];

        while let Some((id, polygons)) = work.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = match self.nodes[id].plane {
                Some(plane) => plane,
                None => {
                    let plane = polygons[0].plane;
                    self.nodes[id].plane = Some(plane);
                    plane
                }
            };

            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                polygon.split(
                    &plane,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }

            let node = &mut self.nodes[id];
            node.polygons.append(&mut coplanar_front);
            node.polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                let child = self.child(id, true)?;
                work.push((child, front));
            }
            if !back.is_empty() {
                let child = self.child(id, false)?;
                work.push((child, back));
            }
        }

        Ok(())
    }

    /// Returns the front or back child of `id`, allocating it if missing.
    fn child(&mut self, id: NodeId, front: bool) -> MeshResult<NodeId> {
        let existing = if front {
            self.nodes[id].front
        } else {
            self.nodes[id].back
        };
        if let Some(child) = existing {
            return Ok(child);
        }

        let depth = self.nodes[id].depth + 1;
        if depth > MAX_BSP_DEPTH {
            return Err(MeshError::boolean_failed(format!(
                "BSP tree exceeded maximum depth of {MAX_BSP_DEPTH}"
            )));
        }

        let child = self.nodes.len();
        self.nodes.push(Node {
            depth,
            ..Node::default()
        });
        if front {
            self.nodes[id].front = Some(child);
        } else {
            self.nodes[id].back = Some(child);
        }
        Ok(child)
    }

    /// Converts solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = &mut node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut work: Vec<(NodeId, Vec<Polygon>)> = vec![(0, polygons)];

        while let Some((id, polygons)) = work.pop() {
            let node = &self.nodes[id];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                polygon.split(
                    &plane,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            match node.front {
                Some(child) => work.push((child, front)),
                None => kept.extend(front),
            }
            // Polygons behind a leaf are inside the solid and dropped
            if let Some(child) = node.back {
                work.push((child, back));
            }
        }

        kept
    }

    /// Removes every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Collects all polygons from the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }

    /// Number of polygons stored in the tree.
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|node| node.polygons.len()).sum()
    }
}

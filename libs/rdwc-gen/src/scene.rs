//! # Scene
//!
//! Named solids grouped by category. The scene is owned by one generator
//! and rebuilt from scratch on every run.
//!
//! ## Structure
//!
//! ```text
//! Scene
//! ├── Pots      [Pot_0_0, Pot_0_1, Main_Reservoir, ...]
//! ├── Fittings  [Tee_Inlet_0, ...]
//! ├── Pipes     [Manifold_Pipe_In_0, ...]
//! └── ...
//! ```
//!
//! Groups appear in the order they are first used. Names are unique across
//! the whole scene.

use std::collections::HashSet;
use std::fmt;

use crate::error::SceneError;
use crate::placement::Placement;
use glam::{DMat4, DVec3};
use rdwc_mesh::ops::{bevel_sharp_edges, split_normals};
use rdwc_mesh::Mesh;

// =============================================================================
// PART KINDS & CATEGORIES
// =============================================================================

/// What a solid represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Pot,
    Reservoir,
    BalanceTank,
    Pipe,
    Tee,
    Elbow,
    Union,
    BallValve,
    CheckValve,
    FlowMeter,
    Bulkhead,
    EndCap,
    ManifoldBlock,
    DripEmitter,
    Pump,
    AirPump,
    AirStone,
    LevelSensor,
    ProbeHolder,
    LightPanel,
    PipingSystem,
}

impl PartKind {
    /// Group a part of this kind is linked into.
    pub fn category(self) -> Category {
        match self {
            Self::Pot | Self::Reservoir | Self::BalanceTank => Category::Pots,
            Self::Pipe => Category::Pipes,
            Self::Tee
            | Self::Elbow
            | Self::Union
            | Self::Bulkhead
            | Self::EndCap
            | Self::ManifoldBlock
            | Self::DripEmitter => Category::Fittings,
            Self::BallValve | Self::CheckValve => Category::Valves,
            Self::FlowMeter | Self::LevelSensor | Self::ProbeHolder => Category::Sensors,
            Self::Pump => Category::Pumps,
            Self::AirPump | Self::AirStone => Category::Aeration,
            Self::LightPanel => Category::Lighting,
            Self::PipingSystem => Category::System,
        }
    }

    /// Fittings that are merged into the piping system.
    ///
    /// Valves, meters, pumps and sensors stay separate parts.
    pub fn is_simple_fitting(self) -> bool {
        matches!(
            self,
            Self::Tee
                | Self::Elbow
                | Self::Union
                | Self::EndCap
                | Self::Bulkhead
                | Self::ManifoldBlock
                | Self::DripEmitter
        )
    }
}

/// Collection a solid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Pots,
    Pipes,
    Fittings,
    Pumps,
    Sensors,
    Aeration,
    Valves,
    Lighting,
    System,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Pots,
        Self::Pipes,
        Self::Fittings,
        Self::Pumps,
        Self::Sensors,
        Self::Aeration,
        Self::Valves,
        Self::Lighting,
        Self::System,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pots => "Pots",
            Self::Pipes => "Pipes",
            Self::Fittings => "Fittings",
            Self::Pumps => "Pumps",
            Self::Sensors => "Sensors",
            Self::Aeration => "Aeration",
            Self::Valves => "Valves",
            Self::Lighting => "Lighting",
            Self::System => "System",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// SOLID
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    #[default]
    Flat,
    Smooth,
}

/// Deferred mesh edits, applied during finalization or export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// Softens edges bent more than `angle_limit` radians.
    Bevel {
        width: f64,
        segments: u32,
        angle_limit: f64,
    },
    /// Splits smooth normals at edges sharper than `angle` radians.
    EdgeSplit { angle: f64 },
}

/// Light-emitting surface attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub color: [f32; 4],
    pub strength: f32,
}

/// A closed mesh in local coordinates with a world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub name: String,
    pub mesh: Mesh,
    pub transform: DMat4,
    pub kind: PartKind,
    pub shading: Shading,
    pub modifiers: Vec<Modifier>,
    pub emission: Option<Emission>,
}

impl Solid {
    /// Creates a solid at the origin.
    pub fn new(name: impl Into<String>, mesh: Mesh, kind: PartKind) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: DMat4::IDENTITY,
            kind,
            shading: Shading::Flat,
            modifiers: Vec::new(),
            emission: None,
        }
    }

    /// Creates a solid at a placement.
    pub fn placed(name: impl Into<String>, mesh: Mesh, kind: PartKind, placement: &Placement) -> Self {
        let mut solid = Self::new(name, mesh, kind);
        solid.transform = placement.matrix();
        solid
    }

    pub fn location(&self) -> DVec3 {
        self.transform.w_axis.truncate()
    }

    /// Mesh in world coordinates.
    pub fn world_mesh(&self) -> Mesh {
        self.mesh.transformed(&self.transform)
    }

    /// Bakes the transform into the mesh and resets it to identity.
    pub fn apply_transform(&mut self) {
        self.mesh.transform(&self.transform);
        self.transform = DMat4::IDENTITY;
    }

    /// Applies and clears every pending modifier, in order.
    pub fn apply_modifiers(&mut self) {
        for modifier in std::mem::take(&mut self.modifiers) {
            match modifier {
                Modifier::Bevel {
                    width,
                    segments,
                    angle_limit,
                } => {
                    bevel_sharp_edges(&mut self.mesh, width, segments, angle_limit);
                }
                Modifier::EdgeSplit { angle } => {
                    self.mesh = split_normals(&self.mesh, Some(angle));
                }
            }
        }
    }

    /// World-space bounding box.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        if self.mesh.vertex_count() == 0 {
            return None;
        }
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for v in self.mesh.vertices() {
            let w = self.transform.transform_point3(*v);
            min = min.min(w);
            max = max.max(w);
        }
        Some((min, max))
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// One named bucket of solids.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionGroup {
    pub category: Category,
    pub solids: Vec<Solid>,
}

/// Working set of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    groups: Vec<CollectionGroup>,
    names: HashSet<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a solid to the group of its kind, creating the group on first use.
    pub fn link(&mut self, solid: Solid) -> Result<(), SceneError> {
        self.link_into(solid.kind.category(), solid)
    }

    /// Adds a solid to an explicit group.
    pub fn link_into(&mut self, category: Category, solid: Solid) -> Result<(), SceneError> {
        if self.names.contains(&solid.name) {
            return Err(SceneError::DuplicateName { name: solid.name });
        }
        self.names.insert(solid.name.clone());
        let index = match self.groups.iter().position(|g| g.category == category) {
            Some(index) => index,
            None => {
                self.groups.push(CollectionGroup {
                    category,
                    solids: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[index].solids.push(solid);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn groups(&self) -> &[CollectionGroup] {
        &self.groups
    }

    pub fn group(&self, category: Category) -> Option<&CollectionGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn find(&self, name: &str) -> Option<&Solid> {
        self.solids().find(|s| s.name == name)
    }

    /// Every solid in group order.
    pub fn solids(&self) -> impl Iterator<Item = &Solid> {
        self.groups.iter().flat_map(|g| g.solids.iter())
    }

    /// Removes and returns every solid matching `predicate`.
    pub fn take(&mut self, mut predicate: impl FnMut(&Solid) -> bool) -> Vec<Solid> {
        let mut taken = Vec::new();
        for group in &mut self.groups {
            let (matched, kept): (Vec<Solid>, Vec<Solid>) =
                std::mem::take(&mut group.solids).into_iter().partition(|s| predicate(s));
            group.solids = kept;
            taken.extend(matched);
        }
        for solid in &taken {
            self.names.remove(&solid.name);
        }
        taken
    }

    pub fn count(&self, category: Category) -> usize {
        self.group(category).map_or(0, |g| g.solids.len())
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.solids.len()).sum()
    }

    /// Removes every group and name.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.names.clear();
    }

    /// World bounding box over the given groups.
    pub fn bounding_box(&self, categories: &[Category]) -> Option<(DVec3, DVec3)> {
        self.groups
            .iter()
            .filter(|g| categories.contains(&g.category))
            .flat_map(|g| g.solids.iter())
            .filter_map(Solid::bounding_box)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rdwc_mesh::primitives::create_cube;

    fn unit(name: &str, kind: PartKind) -> Solid {
        Solid::new(name, create_cube(DVec3::ONE, true).unwrap(), kind)
    }

    #[test]
    fn test_link_creates_groups_lazily() {
        let mut scene = Scene::new();
        assert!(scene.groups().is_empty());
        scene.link(unit("Pot_0_0", PartKind::Pot)).unwrap();
        scene.link(unit("Tee_Inlet_0", PartKind::Tee)).unwrap();
        scene.link(unit("Pot_0_1", PartKind::Pot)).unwrap();

        assert_eq!(scene.groups().len(), 2);
        assert_eq!(scene.groups()[0].category, Category::Pots);
        assert_eq!(scene.count(Category::Pots), 2);
        assert_eq!(scene.count(Category::Fittings), 1);
        assert_eq!(scene.total(), 3);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut scene = Scene::new();
        scene.link(unit("Pot_0_0", PartKind::Pot)).unwrap();
        let err = scene.link(unit("Pot_0_0", PartKind::Tee)).unwrap_err();
        assert_eq!(
            err,
            SceneError::DuplicateName {
                name: "Pot_0_0".to_string()
            }
        );
        assert_eq!(scene.total(), 1);
    }

    #[test]
    fn test_take_releases_names() {
        let mut scene = Scene::new();
        scene.link(unit("Pipe_a", PartKind::Pipe)).unwrap();
        scene.link(unit("Valve", PartKind::BallValve)).unwrap();

        let taken = scene.take(|s| s.kind == PartKind::Pipe);
        assert_eq!(taken.len(), 1);
        assert!(!scene.contains("Pipe_a"));
        assert_eq!(scene.count(Category::Pipes), 0);
        scene.link(unit("Pipe_a", PartKind::Pipe)).unwrap();
    }

    #[test]
    fn test_bounding_box_uses_world_transform() {
        let mut scene = Scene::new();
        let mut pot = unit("Pot", PartKind::Pot);
        pot.transform = DMat4::from_translation(DVec3::new(2.0, 0.0, 0.0));
        scene.link(pot).unwrap();
        scene.link(unit("Panel", PartKind::LightPanel)).unwrap();

        let (min, max) = scene.bounding_box(&[Category::Pots]).unwrap();
        assert!(min.abs_diff_eq(DVec3::new(1.5, -0.5, -0.5), 1e-12));
        assert!(max.abs_diff_eq(DVec3::new(2.5, 0.5, 0.5), 1e-12));
        assert!(scene.bounding_box(&[Category::Pumps]).is_none());
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        scene.link(unit("Pot", PartKind::Pot)).unwrap();
        scene.clear();
        assert_eq!(scene.total(), 0);
        assert!(!scene.contains("Pot"));
    }

    #[test]
    fn test_apply_modifiers_clears_queue() {
        let mut solid = unit("Tee", PartKind::Tee);
        solid.modifiers.push(Modifier::Bevel {
            width: 0.05,
            segments: 2,
            angle_limit: 30f64.to_radians(),
        });
        solid.modifiers.push(Modifier::EdgeSplit {
            angle: 30f64.to_radians(),
        });
        solid.apply_modifiers();
        assert!(solid.modifiers.is_empty());
        assert_eq!(solid.mesh.vertex_count(), 24);
        assert!(solid.mesh.normals().is_some());
    }

    #[test]
    fn test_simple_fitting_classification() {
        assert!(PartKind::Tee.is_simple_fitting());
        assert!(PartKind::ManifoldBlock.is_simple_fitting());
        assert!(!PartKind::BallValve.is_simple_fitting());
        assert!(!PartKind::FlowMeter.is_simple_fitting());
        assert_eq!(PartKind::FlowMeter.category(), Category::Sensors);
    }
}

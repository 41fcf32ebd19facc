//! Wavefront OBJ export of a generated scene.

use rdwc_gen::scene::{Scene, Shading};

/// Writes every solid as one OBJ object in world coordinates.
///
/// Pending modifiers are applied to a copy first; smooth solids without
/// normals get averaged vertex normals.
pub fn scene_to_obj(scene: &Scene) -> Result<String, std::fmt::Error> {
    let mut out = String::from("# RDWC system\n");
    let mut index_base = 0;
    for group in scene.groups() {
        for solid in &group.solids {
            let mut solid = solid.clone();
            solid.apply_modifiers();
            let mut mesh = solid.world_mesh();
            if solid.shading == Shading::Smooth && mesh.normals().is_none() {
                mesh.compute_normals();
            }
            mesh.write_obj(&mut out, &solid.name, index_base)?;
            index_base += mesh.vertex_count();
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use rdwc_gen::scene::{PartKind, Solid};
    use rdwc_mesh::primitives::create_cube;

    #[test]
    fn test_indices_continue_across_objects() {
        let mut scene = Scene::new();
        let cube = create_cube(DVec3::splat(1.0), true).unwrap();
        scene.link(Solid::new("Pot_0_0", cube.clone(), PartKind::Pot)).unwrap();
        scene.link(Solid::new("Pot_0_1", cube, PartKind::Pot)).unwrap();

        let obj = scene_to_obj(&scene).unwrap();
        assert!(obj.contains("o Pot_0_0"));
        assert!(obj.contains("o Pot_0_1"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 16);
        // The second cube's faces start after the first cube's vertices
        let last_face = obj.lines().filter(|l| l.starts_with("f ")).last().unwrap();
        assert!(last_face
            .split_whitespace()
            .skip(1)
            .all(|i| i.parse::<usize>().unwrap() > 8));
    }
}

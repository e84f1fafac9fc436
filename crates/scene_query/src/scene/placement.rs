//! Seeded placement of entity clones
//!
//! Positions are drawn from an explicit [`UnitRandom`] source, one `x`, `y`,
//! `z` triple per object in that order, so a given seed always rebuilds the
//! same scene.

use super::{SceneError, SceneManager};
use crate::foundation::math::Vec3;
use crate::foundation::random::UnitRandom;

/// Draw `count` positions inside the box `[min, max]`
pub fn random_positions(rng: &mut impl UnitRandom, count: usize, min: Vec3, max: Vec3) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let x = rng.range_random(min.x, max.x);
            let y = rng.range_random(min.y, max.y);
            let z = rng.range_random(min.z, max.z);
            Vec3::new(x, y, z)
        })
        .collect()
}

/// Place `count` clones of the entity `source` at random positions
///
/// Clone `n` is named `n` (decimal) and gets its own node under the root.
/// Returns the nodes created, in clone order.
pub fn create_random_entity_clones(
    scene: &mut SceneManager,
    source: &str,
    count: usize,
    min: Vec3,
    max: Vec3,
    rng: &mut impl UnitRandom,
) -> Result<Vec<super::NodeId>, SceneError> {
    if scene.entity(source).is_none() {
        return Err(SceneError::EntityNotFound(source.to_string()));
    }

    let root = scene.root_scene_node();
    let positions = random_positions(rng, count, min, max);
    let mut nodes = Vec::with_capacity(count);

    for (n, position) in positions.into_iter().enumerate() {
        let node = scene.create_scene_node();
        scene.set_position(node, position)?;
        scene.add_child(root, node)?;

        let name = n.to_string();
        scene.clone_entity(source, name.as_str())?;
        scene.attach_object(node, &name)?;
        nodes.push(node);
    }

    log::info!("Placed {count} clones of '{source}' in {min:?}..{max:?}");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SceneConfig;
    use crate::foundation::random::{LibcRand, RngSource};
    use crate::scene::MeshDescriptor;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn cube() -> Vec3 {
        Vec3::new(2500.0, 2500.0, 2500.0)
    }

    #[test]
    fn test_positions_are_reproducible_and_in_range() {
        let first = random_positions(&mut LibcRand::new(5), 50, -cube(), cube());
        let second = random_positions(&mut LibcRand::new(5), 50, -cube(), cube());
        assert_eq!(first, second);
        for p in &first {
            assert!(p.iter().all(|c| (-2500.0..=2500.0).contains(c)));
        }
    }

    #[test]
    fn test_first_positions_for_seed_five() {
        let positions = random_positions(&mut LibcRand::new(5), 1, -cube(), cube());
        assert_relative_eq!(positions[0], Vec3::new(-1126.2721, -2267.6611, 2463.7764), epsilon = 1e-2);
    }

    #[test]
    fn test_any_rng_can_drive_placement() {
        let mut a = RngSource(StdRng::seed_from_u64(42));
        let mut b = RngSource(StdRng::seed_from_u64(42));
        assert_eq!(
            random_positions(&mut a, 10, -cube(), cube()),
            random_positions(&mut b, 10, -cube(), cube())
        );
    }

    #[test]
    fn test_clones_are_named_and_attached() {
        let mut scene = SceneManager::new("placement", SceneConfig::default());
        scene
            .create_entity("501", Arc::new(MeshDescriptor::sphere("sphere.mesh", 100.0)))
            .unwrap();

        let nodes = create_random_entity_clones(&mut scene, "501", 3, -cube(), cube(), &mut LibcRand::new(5)).unwrap();
        assert_eq!(nodes.len(), 3);
        for (n, node) in nodes.iter().enumerate() {
            let entity = scene.entity(&n.to_string()).unwrap();
            assert_eq!(entity.parent_node(), Some(*node));
            assert_eq!(scene.node(*node).unwrap().parent(), Some(scene.root_scene_node()));
        }

        let missing = create_random_entity_clones(&mut scene, "nope", 1, -cube(), cube(), &mut LibcRand::new(5));
        assert_eq!(missing.unwrap_err(), SceneError::EntityNotFound("nope".to_string()));
    }
}

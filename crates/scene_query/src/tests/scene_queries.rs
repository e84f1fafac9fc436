//! Reference scene: a sphere at the origin plus 500 clones scattered with a
//! seeded generator, viewed by a camera on the +Z axis

use crate::core::{EngineConfig, PartitionConfig, SceneConfig};
use crate::engine::Root;
use crate::foundation::math::Vec3;
use crate::foundation::random::LibcRand;
use crate::query::{NameOrdering, QueryFlags};
use crate::scene::{create_random_entity_clones, MeshDescriptor, SceneManager};
use crate::spatial::OctreeConfig;
use crate::spatial::AABB;
use approx::assert_relative_eq;
use std::sync::Arc;

/// Expected overlapping pairs, in byte order of the names
const EXPECTED_PAIRS: [(u32, u32); 45] = [
    (1, 421), (102, 356), (108, 269), (116, 239), (118, 409), (122, 60), (125, 129),
    (127, 51), (142, 175), (144, 371), (150, 501), (152, 315), (164, 4), (185, 366),
    (190, 484), (199, 448), (205, 386), (212, 60), (224, 288), (228, 287), (232, 284),
    (24, 498), (246, 280), (254, 277), (274, 406), (286, 497), (297, 444), (313, 34),
    (313, 65), (328, 336), (348, 384), (350, 466), (358, 377), (36, 39), (360, 499),
    (365, 488), (368, 63), (372, 403), (376, 458), (382, 475), (426, 487), (450, 462),
    (456, 50), (464, 77), (480, 87),
];

const CLONE_COUNT: usize = 500;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn populate(scene: &mut SceneManager) {
    let camera = scene.create_camera("Camera").unwrap();
    camera.set_position(Vec3::new(0.0, 0.0, 500.0));
    camera.look_at(Vec3::zeros());

    scene
        .create_entity("501", Arc::new(MeshDescriptor::sphere("sphere.mesh", 100.0)))
        .unwrap();
    // One at the origin so the centre ray always hits something
    let node = scene.create_child_scene_node(scene.root_scene_node()).unwrap();
    scene.attach_object(node, "501").unwrap();

    let extent = Vec3::new(2500.0, 2500.0, 2500.0);
    create_random_entity_clones(scene, "501", CLONE_COUNT, -extent, extent, &mut LibcRand::new(5)).unwrap();
    scene.update_scene_graph().unwrap();
}

fn scene_with(partition: PartitionConfig, ordering: NameOrdering) -> SceneManager {
    init_logging();
    let config = SceneConfig::new().with_partition(partition).with_name_ordering(ordering);
    let mut scene = SceneManager::new("SceneQueryTest", config);
    populate(&mut scene);
    scene
}

fn expected_strings() -> Vec<(String, String)> {
    EXPECTED_PAIRS
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn pair_strings(scene: &SceneManager) -> Vec<(String, String)> {
    scene
        .create_intersection_query()
        .execute(scene.registry())
        .into_iter()
        .map(|pair| (pair.first, pair.second))
        .collect()
}

fn dense_octree() -> PartitionConfig {
    PartitionConfig::Octree(OctreeConfig {
        world_bounds: AABB::cube(4096.0),
        max_objects_per_node: 4,
        max_depth: 6,
        min_node_size: 10.0,
    })
}

#[test]
fn test_reference_scene_is_registered() {
    let scene = scene_with(PartitionConfig::Linear, NameOrdering::Lexical);
    assert_eq!(scene.registry().len(), CLONE_COUNT + 1);
    assert_eq!(scene.registry().iter().next().unwrap().name, "501");

    let clone = scene.registry().get("0").unwrap();
    assert_relative_eq!(clone.position, Vec3::new(-1126.2721, -2267.6611, 2463.7764), epsilon = 1e-2);
}

#[test]
fn test_intersection_pairs_in_byte_order() {
    for partition in [PartitionConfig::Linear, PartitionConfig::default(), dense_octree()] {
        let scene = scene_with(partition, NameOrdering::Lexical);
        assert_eq!(pair_strings(&scene), expected_strings());
    }
}

#[test]
fn test_intersection_pairs_in_numeric_order() {
    let scene = scene_with(PartitionConfig::default(), NameOrdering::Numeric);

    let mut expected: Vec<(u32, u32)> = EXPECTED_PAIRS.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();
    expected.sort_unstable();
    let expected: Vec<(String, String)> = expected
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();

    assert_eq!(pair_strings(&scene), expected);
}

#[test]
fn test_centre_ray_hits_origin_sphere_first() {
    for partition in [PartitionConfig::Linear, PartitionConfig::default(), dense_octree()] {
        let scene = scene_with(partition, NameOrdering::Numeric);
        let ray = scene.camera("Camera").unwrap().camera_to_viewport_ray(0.5, 0.5);

        let mut query = scene.create_ray_query(ray);
        query.set_sort_by_distance(true, 2);
        let result = query.execute(scene.registry()).unwrap();

        assert_eq!(result.names(), ["501", "150"]);
        assert_relative_eq!(result[0].distance, 300.0, epsilon = 1e-3);
        assert_relative_eq!(result[1].distance, 450.1396, epsilon = 1e-2);
        assert!(result[0].distance <= result[1].distance);
    }
}

#[test]
fn test_unsorted_ray_uses_registration_order() {
    let scene = scene_with(PartitionConfig::default(), NameOrdering::Numeric);
    let ray = scene.camera("Camera").unwrap().camera_to_viewport_ray(0.5, 0.5);

    let result = scene.create_ray_query(ray).execute(scene.registry()).unwrap();
    assert_eq!(result.names(), ["501", "150"]);
}

#[test]
fn test_sort_limit_of_one() {
    let scene = scene_with(PartitionConfig::Linear, NameOrdering::Numeric);
    let ray = scene.camera("Camera").unwrap().camera_to_viewport_ray(0.5, 0.5);

    let mut query = scene.create_ray_query(ray);
    query.set_sort_by_distance(true, 1);
    assert_eq!(query.execute(scene.registry()).unwrap().names(), ["501"]);
}

#[test]
fn test_masked_objects_drop_out_of_both_queries() {
    let mut scene = scene_with(PartitionConfig::default(), NameOrdering::Lexical);
    scene.set_query_flags("501", QueryFlags::DEBUG).unwrap();

    let pickable = QueryFlags::all() - QueryFlags::DEBUG;
    let pairs = scene
        .create_intersection_query()
        .with_query_mask(pickable)
        .execute(scene.registry());
    assert_eq!(pairs.len(), EXPECTED_PAIRS.len() - 1);
    assert!(!pairs.contains("150", "501"));

    let ray = scene.camera("Camera").unwrap().camera_to_viewport_ray(0.5, 0.5);
    let mut query = scene.create_ray_query(ray).with_query_mask(pickable);
    query.set_sort_by_distance(true, 2);
    assert_eq!(query.execute(scene.registry()).unwrap().names(), ["150"]);
}

#[test]
fn test_remove_and_reinsert_restores_results() {
    let mut scene = scene_with(PartitionConfig::default(), NameOrdering::Lexical);
    let before = pair_strings(&scene);

    let node = scene.entity("150").unwrap().parent_node().unwrap();
    scene.destroy_entity("150").unwrap();
    assert_eq!(scene.registry().len(), CLONE_COUNT);
    assert_eq!(pair_strings(&scene).len(), EXPECTED_PAIRS.len() - 1);

    scene.clone_entity("501", "150").unwrap();
    scene.attach_object(node, "150").unwrap();
    scene.update_scene_graph().unwrap();
    assert_eq!(pair_strings(&scene), before);
}

#[test]
fn test_bulk_removal_empties_registry() {
    let mut scene = scene_with(PartitionConfig::default(), NameOrdering::Numeric);
    let root = scene.root_scene_node();

    scene.remove_and_destroy_all_children(root).unwrap();
    assert!(scene.registry().is_empty());
    assert_eq!(scene.registry().index().object_count(), 0);
    assert!(scene.create_intersection_query().execute(scene.registry()).is_empty());

    // Nothing left for the update to find
    scene.update_scene_graph().unwrap();
    assert!(scene.registry().is_empty());
}

#[test]
fn test_root_lifecycle() {
    init_logging();

    // A root that is created and shut down without use
    let mut root = Root::new(EngineConfig::default()).unwrap();
    root.shutdown();

    // A scene manager whose root children are all destroyed
    let mut root = Root::new(EngineConfig::default()).unwrap();
    let scene = root.create_scene_manager().unwrap();
    let top = scene.root_scene_node();
    scene.create_child_scene_node(top).unwrap();
    scene.create_child_scene_node(top).unwrap();
    scene.remove_and_destroy_all_children(top).unwrap();
    assert!(scene.node(top).unwrap().children().is_empty());
    root.shutdown();
    root.shutdown();
}

#[test]
fn test_reference_scene_through_root() {
    init_logging();
    let config = EngineConfig::new().with_scene(SceneConfig::new().with_name_ordering(NameOrdering::Lexical));
    let mut root = Root::new(config).unwrap();
    let scene = root.create_named_scene_manager("reference").unwrap();
    populate(scene);

    let scene = root.scene_manager("reference").unwrap();
    assert_eq!(pair_strings(scene), expected_strings());
}

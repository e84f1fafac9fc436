//! Scene Query Demo
//!
//! Builds the reference scene (a sphere at the origin and 500 seeded clones)
//! and prints the overlapping pairs and what the camera's centre ray hits.
//!
//! Usage: `query_demo [config.toml|config.ron] [--seed N]`
//!
//! Without `--seed` the clones are placed with the C-library-compatible
//! generator seeded with 5; with it, a `StdRng` seeded with `N` is used.

use rand::{rngs::StdRng, SeedableRng};
use scene_query::foundation::logging;
use scene_query::prelude::*;
use scene_query::scene::create_random_entity_clones;
use std::sync::Arc;

const CLONE_COUNT: usize = 500;
const PLACEMENT_EXTENT: f32 = 2500.0;
const SPHERE_RADIUS: f32 = 100.0;

struct Args {
    config_path: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = Args {
        config_path: None,
        seed: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--seed" {
            let value = iter.next().ok_or("--seed needs a value")?;
            args.seed = Some(value.parse()?);
        } else {
            args.config_path = Some(arg);
        }
    }
    Ok(args)
}

fn build_scene(scene: &mut SceneManager, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let camera = scene.create_camera("Camera")?;
    camera.set_position(Vec3::new(0.0, 0.0, 500.0));
    camera.look_at(Vec3::zeros());

    scene.create_entity("501", Arc::new(MeshDescriptor::sphere("sphere.mesh", SPHERE_RADIUS)))?;
    let origin_node = scene.create_child_scene_node(scene.root_scene_node())?;
    scene.attach_object(origin_node, "501")?;

    let extent = Vec3::new(PLACEMENT_EXTENT, PLACEMENT_EXTENT, PLACEMENT_EXTENT);
    match seed {
        Some(seed) => {
            let mut rng = RngSource(StdRng::seed_from_u64(seed));
            create_random_entity_clones(scene, "501", CLONE_COUNT, -extent, extent, &mut rng)?;
        }
        None => {
            let mut rng = LibcRand::new(5);
            create_random_entity_clones(scene, "501", CLONE_COUNT, -extent, extent, &mut rng)?;
        }
    }

    scene.update_scene_graph()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    if logging::init_with_filter(&config.log_level).is_err() {
        eprintln!("Logger already initialized");
    }

    let mut root = Root::new(config)?;
    let scene = root.create_scene_manager()?;
    build_scene(scene, args.seed)?;

    println!("=== Scene Query Demo ===");
    println!("Objects: {}", scene.registry().len());
    println!("Index: {}", scene.registry().index().name());

    let pairs = scene.create_intersection_query().execute(scene.registry());
    println!();
    println!("Intersecting pairs ({}):", pairs.len());
    for pair in &pairs {
        println!("  {} <-> {}", pair.first, pair.second);
    }

    let ray = scene.camera("Camera")?.camera_to_viewport_ray(0.5, 0.5);
    let mut ray_query = scene.create_ray_query(ray);
    ray_query.set_sort_by_distance(true, 2);
    let hits = ray_query.execute(scene.registry())?;

    println!();
    println!("Centre ray hits ({}):", hits.len());
    for hit in &hits {
        println!("  {} at distance {:.3}", hit.name, hit.distance);
    }

    root.shutdown();
    log::info!("Demo complete");
    Ok(())
}

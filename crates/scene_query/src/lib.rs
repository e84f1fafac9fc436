//! # Scene Query
//!
//! Spatial queries over a scene graph: every pair of objects whose bounding
//! boxes overlap, the objects a ray passes through, and the objects inside a
//! box or sphere.
//!
//! ## Features
//!
//! - **Deterministic results**: pairs and hits come back in a fixed order
//!   built from object names, never from storage layout
//! - **Pluggable partitioning**: linear list or octree, both exact
//! - **Reproducible scenes**: seeded placement through an explicit random
//!   source
//! - **Config files**: engine and scene settings in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_query::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut root = Root::new(EngineConfig::default())?;
//! let scene = root.create_scene_manager()?;
//! let sphere = Arc::new(MeshDescriptor::sphere("sphere.mesh", 1.0));
//!
//! for (name, x) in [("a", 0.0), ("b", 1.5), ("c", 10.0)] {
//!     let node = scene.create_child_scene_node(scene.root_scene_node())?;
//!     scene.set_position(node, Vec3::new(x, 0.0, 0.0))?;
//!     scene.create_entity(name, Arc::clone(&sphere))?;
//!     scene.attach_object(node, name)?;
//! }
//! scene.update_scene_graph()?;
//!
//! let pairs = scene.create_intersection_query().execute(scene.registry());
//! assert!(pairs.contains("a", "b"));
//!
//! let mut ray_query = scene.create_ray_query(Ray::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)));
//! ray_query.set_sort_by_distance(true, 1);
//! let hits = ray_query.execute(scene.registry())?;
//! assert_eq!(hits[0].name, "c");
//!
//! root.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod foundation;
pub mod query;
pub mod scene;
pub mod spatial;

pub use engine::{EngineError, Root};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::{Config, EngineConfig, PartitionConfig, SceneConfig},
        engine::{EngineError, Root},
        foundation::{
            math::Vec3,
            random::{LibcRand, RngSource, UnitRandom},
        },
        query::{
            IntersectionQuery, IntersectionResult, NameOrdering, QueryError, QueryFlags, Ray, RayHit, RayQuery,
            RayQueryResult, Region, RegionQuery,
        },
        scene::{Camera, Entity, MeshDescriptor, NodeId, SceneError, SceneManager},
        spatial::{BoundsProvider, OctreeConfig, RegistryError, SpatialRegistry, AABB},
    };
}

#[cfg(test)]
mod tests;

//! Scene graph
//!
//! A translation-only node hierarchy with entities and cameras, managed by a
//! [`SceneManager`] that feeds the spatial registry used by scene queries.

pub mod camera;
pub mod entity;
pub mod node;
pub mod placement;
pub mod scene_manager;

pub use camera::Camera;
pub use entity::{Entity, MeshDescriptor};
pub use node::{NodeId, SceneNode};
pub use placement::{create_random_entity_clones, random_positions};
pub use scene_manager::{SceneError, SceneManager};

//! Spatial data structures
//!
//! Bounding volumes, the registry of queryable objects and the pluggable
//! indexes (linear list, octree) the query engines run against.

pub mod aabb;
pub mod index;
pub mod octree;
pub mod registry;

pub use aabb::{BoundsProvider, AABB};
pub use index::{LinearIndex, SpatialIndex};
pub use octree::{Octree, OctreeConfig, OctreeNode};
pub use registry::{RegistryError, SpatialObject, SpatialRegistry};

slotmap::new_key_type! {
    /// Stable handle to an object stored in a [`SpatialRegistry`]
    pub struct ObjectKey;
}

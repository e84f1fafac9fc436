//! Entities and the mesh data they share

use crate::query::QueryFlags;
use crate::spatial::{BoundsProvider, AABB};
use std::sync::Arc;

use super::NodeId;

/// Bounds of a loaded mesh
///
/// Stands in for real mesh data; only the local bounding box matters to
/// scene queries.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDescriptor {
    /// Mesh name, for diagnostics
    pub name: String,
    /// Local-space bounding box
    pub bounds: AABB,
}

impl MeshDescriptor {
    /// Mesh with the given local bounds
    pub fn new(name: impl Into<String>, bounds: AABB) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Sphere mesh of `radius`, bounded by a cube of the same half-size
    pub fn sphere(name: impl Into<String>, radius: f32) -> Self {
        Self::new(name, AABB::cube(radius))
    }
}

impl BoundsProvider for MeshDescriptor {
    fn local_bounds(&self) -> AABB {
        self.bounds
    }
}

/// A named instance of a mesh that can be attached to a scene node
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    mesh: Arc<MeshDescriptor>,
    pub(crate) query_flags: QueryFlags,
    pub(crate) attached_to: Option<NodeId>,
}

impl Entity {
    pub(crate) fn new(name: String, mesh: Arc<MeshDescriptor>, query_flags: QueryFlags) -> Self {
        Self {
            name,
            mesh,
            query_flags,
            attached_to: None,
        }
    }

    /// Detached copy sharing this entity's mesh and query flags
    pub(crate) fn clone_as(&self, name: String) -> Self {
        Self::new(name, Arc::clone(&self.mesh), self.query_flags)
    }

    /// Unique entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared mesh this entity shows
    pub fn mesh(&self) -> &Arc<MeshDescriptor> {
        &self.mesh
    }

    /// Flags tested against query masks
    pub fn query_flags(&self) -> QueryFlags {
        self.query_flags
    }

    /// Node this entity is attached to, if any
    pub fn parent_node(&self) -> Option<NodeId> {
        self.attached_to
    }

    /// True when attached to a node
    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }
}

impl BoundsProvider for Entity {
    fn local_bounds(&self) -> AABB {
        self.mesh.bounds
    }
}

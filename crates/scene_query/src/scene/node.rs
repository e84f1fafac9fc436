//! Scene graph nodes

use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Handle to a node owned by a [`SceneManager`](super::SceneManager)
    pub struct NodeId;
}

/// A translation-only node in the scene hierarchy
///
/// Nodes own no objects; they record the names of the entities attached to
/// them. The manager keeps parent and child links consistent.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) position: Vec3,
    pub(crate) objects: Vec<String>,
}

impl SceneNode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Parent node, None for the root and for detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in the order they were added
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position relative to the parent
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Names of the entities attached to this node
    pub fn attached_objects(&self) -> &[String] {
        &self.objects
    }
}

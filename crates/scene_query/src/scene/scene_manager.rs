//! Scene manager
//!
//! Owns the node hierarchy, entities and cameras of one scene, and keeps the
//! spatial registry that queries run against in step with the hierarchy.
//!
//! New or moved objects reach the registry on the next
//! [`SceneManager::update_scene_graph`]. Anything that takes an object out of
//! the scene (detaching, destroying its entity or one of its ancestor nodes)
//! removes it from the registry straight away, so queries never report an
//! object that no longer exists.

use super::{Camera, Entity, MeshDescriptor, NodeId, SceneNode};
use crate::core::SceneConfig;
use crate::foundation::math::Vec3;
use crate::query::{IntersectionQuery, QueryFlags, Ray, RayQuery, Region, RegionQuery};
use crate::spatial::{BoundsProvider, RegistryError, SpatialObject, SpatialRegistry};
use slotmap::SlotMap;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// An entity or camera with this name already exists
    #[error("An object named '{0}' already exists")]
    DuplicateName(String),

    /// The node handle does not refer to a live node
    #[error("Scene node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// No entity with this name exists
    #[error("Entity '{0}' does not exist")]
    EntityNotFound(String),

    /// No camera with this name exists
    #[error("Camera '{0}' does not exist")]
    CameraNotFound(String),

    /// The entity is already attached to a node
    #[error("Entity '{0}' is already attached to a node")]
    AlreadyAttached(String),

    /// The entity is not attached to the given node
    #[error("Entity '{0}' is not attached to this node")]
    NotAttached(String),

    /// The requested change would break the node hierarchy
    #[error("Invalid scene hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Registry failure while synchronising the scene
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Manages the contents of one scene
#[derive(Debug)]
pub struct SceneManager {
    name: String,
    config: SceneConfig,
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
    entities: BTreeMap<String, Entity>,
    cameras: HashMap<String, Camera>,
    registry: SpatialRegistry,
}

impl SceneManager {
    /// Create an empty scene with only a root node
    pub fn new(name: impl Into<String>, config: SceneConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new());
        let registry = SpatialRegistry::new(config.partition.build_index());
        let name = name.into();

        log::debug!("Created scene manager '{}' with {} index", name, registry.index().name());
        Self {
            name,
            config,
            nodes,
            root,
            entities: BTreeMap::new(),
            cameras: HashMap::new(),
            registry,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the scene was created with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The registry queries run against
    pub fn registry(&self) -> &SpatialRegistry {
        &self.registry
    }

    // Nodes

    /// The root of the hierarchy; it cannot be destroyed
    pub fn root_scene_node(&self) -> NodeId {
        self.root
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    fn node_ref(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Create a node that is not part of the hierarchy yet
    pub fn create_scene_node(&mut self) -> NodeId {
        self.nodes.insert(SceneNode::new())
    }

    /// Create a node as the last child of `parent`
    pub fn create_child_scene_node(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.node_ref(parent)?;
        let child = self.nodes.insert(SceneNode::new());
        self.link(parent, child)?;
        Ok(child)
    }

    /// Make a detached node the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node_ref(parent)?;
        let node = self.node_ref(child)?;

        if child == self.root {
            return Err(SceneError::InvalidHierarchy("the root node cannot be a child".to_string()));
        }
        if node.parent.is_some() {
            return Err(SceneError::InvalidHierarchy(format!("node {child:?} already has a parent")));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::InvalidHierarchy(format!(
                "node {child:?} cannot be added below itself"
            )));
        }

        self.link(parent, child)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// True when `ancestor` is `node` or lies on its path to the top
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Detach `child` (and its subtree) from `parent` without destroying it
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if self.node_ref(child)?.parent != Some(parent) {
            return Err(SceneError::InvalidHierarchy(format!(
                "node {child:?} is not a child of {parent:?}"
            )));
        }

        self.node_mut(parent)?.children.retain(|c| *c != child);
        self.node_mut(child)?.parent = None;
        self.unregister_subtree(child)
    }

    /// Set a node's position relative to its parent
    pub fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError> {
        self.node_mut(node)?.position = position;
        Ok(())
    }

    /// Node position relative to its parent
    pub fn position(&self, node: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.node_ref(node)?.position)
    }

    /// World-space position, the sum of the node's and its ancestors'
    /// positions
    pub fn world_position(&self, node: NodeId) -> Result<Vec3, SceneError> {
        let mut position = self.node_ref(node)?.position;
        let mut current = self.node_ref(node)?.parent;
        while let Some(id) = current {
            let ancestor = self.node_ref(id)?;
            position += ancestor.position;
            current = ancestor.parent;
        }
        Ok(position)
    }

    /// Destroy every descendant of `node`
    ///
    /// Entities attached to destroyed nodes are detached, not destroyed.
    pub fn remove_and_destroy_all_children(&mut self, node: NodeId) -> Result<(), SceneError> {
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.destroy_subtree(child)?;
        }
        Ok(())
    }

    /// Destroy a node and all its descendants
    pub fn destroy_scene_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::InvalidHierarchy("the root node cannot be destroyed".to_string()));
        }
        if let Some(parent) = self.node_ref(node)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != node);
        }
        self.destroy_subtree(node)
    }

    fn destroy_subtree(&mut self, node: NodeId) -> Result<(), SceneError> {
        let removed = self.nodes.remove(node).ok_or(SceneError::NodeNotFound(node))?;
        for name in &removed.objects {
            self.unregister(name)?;
            if let Some(entity) = self.entities.get_mut(name) {
                entity.attached_to = None;
            }
        }
        for child in removed.children {
            self.destroy_subtree(child)?;
        }
        Ok(())
    }

    /// Remove every object in a subtree from the registry
    fn unregister_subtree(&mut self, node: NodeId) -> Result<(), SceneError> {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = self.node_ref(id)?;
            let names = current.objects.clone();
            stack.extend(current.children.iter().copied());
            for name in &names {
                self.unregister(name)?;
            }
        }
        Ok(())
    }

    fn unregister(&mut self, name: &str) -> Result<(), SceneError> {
        if self.registry.contains(name) {
            self.registry.remove(name)?;
        }
        Ok(())
    }

    /// Number of live nodes, including the root and detached nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // Entities

    fn check_name_free(&self, name: &str) -> Result<(), SceneError> {
        if self.entities.contains_key(name) || self.cameras.contains_key(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Create a detached entity showing `mesh`
    pub fn create_entity(&mut self, name: impl Into<String>, mesh: Arc<MeshDescriptor>) -> Result<&Entity, SceneError> {
        let name = name.into();
        self.check_name_free(&name)?;

        log::trace!("Creating entity '{}' with mesh '{}'", name, mesh.name);
        let entity = Entity::new(name.clone(), mesh, self.config.query_mask());
        Ok(self.entities.entry(name).or_insert(entity))
    }

    /// Create a detached copy of `source` named `new_name`
    pub fn clone_entity(&mut self, source: &str, new_name: impl Into<String>) -> Result<&Entity, SceneError> {
        let new_name = new_name.into();
        self.check_name_free(&new_name)?;

        let copy = self
            .entities
            .get(source)
            .ok_or_else(|| SceneError::EntityNotFound(source.to_string()))?
            .clone_as(new_name.clone());
        Ok(self.entities.entry(new_name).or_insert(copy))
    }

    /// Look up an entity
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// All entities, by name
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Destroy an entity, detaching it first
    pub fn destroy_entity(&mut self, name: &str) -> Result<(), SceneError> {
        let entity = self
            .entities
            .remove(name)
            .ok_or_else(|| SceneError::EntityNotFound(name.to_string()))?;

        if let Some(node) = entity.attached_to.and_then(|id| self.nodes.get_mut(id)) {
            node.objects.retain(|n| n != name);
        }
        self.unregister(name)
    }

    /// Attach an entity to a node
    pub fn attach_object(&mut self, node: NodeId, name: &str) -> Result<(), SceneError> {
        self.node_ref(node)?;
        let entity = self
            .entities
            .get_mut(name)
            .ok_or_else(|| SceneError::EntityNotFound(name.to_string()))?;
        if entity.attached_to.is_some() {
            return Err(SceneError::AlreadyAttached(name.to_string()));
        }

        entity.attached_to = Some(node);
        self.node_mut(node)?.objects.push(name.to_string());
        Ok(())
    }

    /// Detach an entity from a node, taking it out of the registry
    pub fn detach_object(&mut self, node: NodeId, name: &str) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(name)
            .ok_or_else(|| SceneError::EntityNotFound(name.to_string()))?;
        if entity.attached_to != Some(node) {
            return Err(SceneError::NotAttached(name.to_string()));
        }

        entity.attached_to = None;
        self.node_mut(node)?.objects.retain(|n| n != name);
        self.unregister(name)
    }

    /// Replace an entity's query flags
    pub fn set_query_flags(&mut self, name: &str, flags: QueryFlags) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(name)
            .ok_or_else(|| SceneError::EntityNotFound(name.to_string()))?;
        entity.query_flags = flags;

        if self.registry.contains(name) {
            self.registry.set_query_flags(name, flags)?;
        }
        Ok(())
    }

    // Cameras

    /// Create a camera with default perspective settings
    pub fn create_camera(&mut self, name: impl Into<String>) -> Result<&mut Camera, SceneError> {
        let name = name.into();
        self.check_name_free(&name)?;
        Ok(self.cameras.entry(name.clone()).or_insert_with(|| Camera::new(name)))
    }

    /// Look up a camera
    pub fn camera(&self, name: &str) -> Result<&Camera, SceneError> {
        self.cameras
            .get(name)
            .ok_or_else(|| SceneError::CameraNotFound(name.to_string()))
    }

    /// Look up a camera for modification
    pub fn camera_mut(&mut self, name: &str) -> Result<&mut Camera, SceneError> {
        self.cameras
            .get_mut(name)
            .ok_or_else(|| SceneError::CameraNotFound(name.to_string()))
    }

    /// Remove a camera, freeing its name
    pub fn destroy_camera(&mut self, name: &str) -> Result<(), SceneError> {
        self.cameras
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SceneError::CameraNotFound(name.to_string()))
    }

    // Scene graph update

    /// Bring the registry in line with the hierarchy
    ///
    /// Walks the tree from the root, depth first and in child order, and
    /// registers every attached entity with its current world bounds.
    /// Entities that left the tree are removed.
    pub fn update_scene_graph(&mut self) -> Result<(), SceneError> {
        let mut live = HashSet::new();
        let mut stack = vec![(self.root, Vec3::zeros())];

        while let Some((id, parent_position)) = stack.pop() {
            let node = self.node_ref(id)?;
            let position = parent_position + node.position;
            // Reverse so the first child is visited first
            stack.extend(node.children.iter().rev().map(|child| (*child, position)));
            let names = node.objects.clone();

            for name in names {
                let entity = self
                    .entities
                    .get(&name)
                    .ok_or_else(|| SceneError::EntityNotFound(name.clone()))?;
                let bounds = entity.world_bounds(position);
                let flags = entity.query_flags;

                if self.registry.contains(&name) {
                    self.registry.update(&name, position, bounds)?;
                    self.registry.set_query_flags(&name, flags)?;
                } else {
                    let object = SpatialObject::with_bounds(name.clone(), position, bounds).with_query_flags(flags);
                    self.registry.insert(object)?;
                }
                live.insert(name);
            }
        }

        let stale: Vec<String> = self
            .registry
            .iter()
            .filter(|object| !live.contains(&object.name))
            .map(|object| object.name.clone())
            .collect();
        for name in &stale {
            self.registry.remove(name)?;
        }

        log::debug!(
            "Scene '{}' updated: {} objects registered, {} removed",
            self.name,
            self.registry.len(),
            stale.len()
        );
        Ok(())
    }

    // Queries

    /// Intersection query using the scene's default mask and name ordering
    pub fn create_intersection_query(&self) -> IntersectionQuery {
        IntersectionQuery::new()
            .with_query_mask(self.config.query_mask())
            .with_ordering(self.config.name_ordering)
    }

    /// Ray query using the scene's default mask and name ordering
    pub fn create_ray_query(&self, ray: Ray) -> RayQuery {
        RayQuery::new(ray)
            .with_query_mask(self.config.query_mask())
            .with_ordering(self.config.name_ordering)
    }

    /// Region query using the scene's default mask
    pub fn create_region_query(&self, region: Region) -> RegionQuery {
        RegionQuery::new(region).with_query_mask(self.config.query_mask())
    }

    /// Remove everything but the root node
    pub fn clear_scene(&mut self) {
        let root = self.root;
        self.nodes.retain(|id, _| id == root);
        if let Some(node) = self.nodes.get_mut(root) {
            node.children.clear();
            node.objects.clear();
            node.position = Vec3::zeros();
        }
        self.entities.clear();
        self.cameras.clear();
        self.registry.clear();
    }
}

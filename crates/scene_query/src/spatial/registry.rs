//! Registry of queryable objects
//!
//! Owns every object the query engines can see, keyed by unique name, and
//! mirrors each change into the configured [`SpatialIndex`].

use super::index::{LinearIndex, SpatialIndex};
use super::{BoundsProvider, ObjectKey, AABB};
use crate::foundation::math::Vec3;
use crate::query::QueryFlags;
use slotmap::SlotMap;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An object with this name is already registered
    #[error("Object '{0}' is already registered")]
    DuplicateIdentity(String),

    /// No object with this name is registered
    #[error("Object '{0}' is not registered")]
    NotFound(String),
}

/// A named, positioned object with world-space bounds
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialObject {
    /// Unique name
    pub name: String,
    /// World-space position
    pub position: Vec3,
    /// World-space bounds
    pub bounds: AABB,
    /// Flags tested against query masks
    pub query_flags: QueryFlags,
    /// Insertion sequence number, assigned by the registry
    pub sequence: u64,
}

impl SpatialObject {
    /// Object placed at `position` with bounds taken from `shape`
    pub fn new(name: impl Into<String>, position: Vec3, shape: &impl BoundsProvider) -> Self {
        Self::with_bounds(name, position, shape.world_bounds(position))
    }

    /// Object with explicit world-space bounds
    pub fn with_bounds(name: impl Into<String>, position: Vec3, bounds: AABB) -> Self {
        Self {
            name: name.into(),
            position,
            bounds,
            query_flags: QueryFlags::default(),
            sequence: 0,
        }
    }

    /// Builder: set the query flags
    pub fn with_query_flags(mut self, flags: QueryFlags) -> Self {
        self.query_flags = flags;
        self
    }
}

/// Name-keyed object store with a spatial index and stable insertion order
#[derive(Debug)]
pub struct SpatialRegistry {
    objects: SlotMap<ObjectKey, SpatialObject>,
    by_name: HashMap<String, ObjectKey>,
    order: BTreeMap<u64, ObjectKey>,
    next_sequence: u64,
    index: Box<dyn SpatialIndex>,
}

impl Default for SpatialRegistry {
    fn default() -> Self {
        Self::new(Box::new(LinearIndex::new()))
    }
}

impl SpatialRegistry {
    /// Create an empty registry backed by `index`
    pub fn new(mut index: Box<dyn SpatialIndex>) -> Self {
        index.clear();
        Self {
            objects: SlotMap::with_key(),
            by_name: HashMap::new(),
            order: BTreeMap::new(),
            next_sequence: 0,
            index,
        }
    }

    /// Register an object
    ///
    /// Fails without changing anything if the name is already taken.
    pub fn insert(&mut self, mut object: SpatialObject) -> Result<ObjectKey, RegistryError> {
        if self.by_name.contains_key(&object.name) {
            return Err(RegistryError::DuplicateIdentity(object.name));
        }

        object.sequence = self.next_sequence;
        self.next_sequence += 1;

        let name = object.name.clone();
        let bounds = object.bounds;
        let sequence = object.sequence;
        let key = self.objects.insert(object);
        self.by_name.insert(name, key);
        self.order.insert(sequence, key);
        self.index.insert(key, bounds);

        log::trace!("Registered object {key:?} (sequence {sequence})");
        Ok(key)
    }

    /// Unregister an object by name, returning it
    pub fn remove(&mut self, name: &str) -> Result<SpatialObject, RegistryError> {
        let key = self
            .by_name
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        self.index.remove(key);
        let object = self
            .objects
            .remove(key)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.order.remove(&object.sequence);

        log::trace!("Unregistered object '{name}'");
        Ok(object)
    }

    /// Move an object and replace its bounds
    pub fn update(&mut self, name: &str, position: Vec3, bounds: AABB) -> Result<(), RegistryError> {
        let key = self.key_of(name).ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let object = self
            .objects
            .get_mut(key)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        object.position = position;
        if object.bounds != bounds {
            object.bounds = bounds;
            self.index.update(key, bounds);
        }
        Ok(())
    }

    /// Replace an object's query flags
    pub fn set_query_flags(&mut self, name: &str, flags: QueryFlags) -> Result<(), RegistryError> {
        let key = self.key_of(name).ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let object = self
            .objects
            .get_mut(key)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        object.query_flags = flags;
        Ok(())
    }

    /// Look up an object by name
    pub fn get(&self, name: &str) -> Option<&SpatialObject> {
        self.key_of(name).and_then(|key| self.objects.get(key))
    }

    /// Handle of a named object
    pub fn key_of(&self, name: &str) -> Option<ObjectKey> {
        self.by_name.get(name).copied()
    }

    /// Look up an object by handle
    pub fn object(&self, key: ObjectKey) -> Option<&SpatialObject> {
        self.objects.get(key)
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All live objects in insertion order
    ///
    /// The iterator is `Clone`, so a traversal can be restarted from any point.
    pub fn iter(&self) -> impl Iterator<Item = &SpatialObject> + Clone + '_ {
        self.order.values().filter_map(move |key| self.objects.get(*key))
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object
    pub fn clear(&mut self) {
        self.objects.clear();
        self.by_name.clear();
        self.order.clear();
        self.index.clear();
    }

    /// The spatial index backing this registry
    pub fn index(&self) -> &dyn SpatialIndex {
        self.index.as_ref()
    }
}

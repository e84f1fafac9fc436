//! Octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical regions for fast spatial queries. Each
//! node subdivides into 8 octants when object density exceeds a threshold.
//!
//! An object is stored in the deepest node whose bounds contain it strictly.
//! Objects that straddle or touch a split plane stay in the parent, and
//! objects outside the world bounds stay in the root. Two objects in sibling
//! subtrees therefore can never overlap, so pair and pruning tests only ever
//! look down a single root-to-leaf path.

use super::index::SpatialIndex;
use super::{ObjectKey, AABB};
use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// World-space bounds of the root node
    pub world_bounds: AABB,

    /// Maximum objects per node before subdivision
    pub max_objects_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node half-size (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            world_bounds: AABB::cube(10_000.0),
            max_objects_per_node: 8,
            max_depth: 8,
            min_node_size: 1.0,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Objects stored at this node
    pub entries: Vec<(ObjectKey, AABB)>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Bounds of octant `octant` (0-7)
    ///
    /// Octant layout: bit 0 = +X, bit 1 = +Y, bit 2 = +Z. Siblings share the
    /// exact center planes, so they neither overlap nor leave gaps.
    fn child_bounds(&self, octant: usize) -> AABB {
        let center = self.bounds.center();
        let (min, max) = (self.bounds.min, self.bounds.max);

        let split = |bit: usize, axis: usize| {
            if octant & bit != 0 {
                (center[axis], max[axis])
            } else {
                (min[axis], center[axis])
            }
        };
        let (x0, x1) = split(1, 0);
        let (y0, y1) = split(2, 1);
        let (z0, z1) = split(4, 2);

        AABB::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }

    /// The octant that strictly contains `bounds`, if any
    fn child_index(&self, bounds: &AABB) -> Option<usize> {
        let center = self.bounds.center();
        let probe = bounds.center();
        let octant = usize::from(probe.x >= center.x)
            | usize::from(probe.y >= center.y) << 1
            | usize::from(probe.z >= center.z) << 2;

        let child_bounds = match &self.children {
            Some(children) => children[octant].bounds,
            None => self.child_bounds(octant),
        };
        child_bounds.contains_strictly(bounds).then_some(octant)
    }

    fn should_subdivide(&self, config: &OctreeConfig) -> bool {
        self.entries.len() >= config.max_objects_per_node
            && self.depth < config.max_depth
            && self.bounds.extents().x > config.min_node_size
    }

    /// Subdivide this node into 8 children and push down what fits
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let depth = self.depth + 1;
        let children: [OctreeNode; 8] = std::array::from_fn(|octant| OctreeNode::new(self.child_bounds(octant), depth));
        self.children = Some(Box::new(children));

        let entries = std::mem::take(&mut self.entries);
        for (key, bounds) in entries {
            match (self.child_index(&bounds), self.children.as_mut()) {
                (Some(octant), Some(children)) => children[octant].entries.push((key, bounds)),
                _ => self.entries.push((key, bounds)),
            }
        }
    }

    /// Insert an object into this node or the deepest child that fits it
    pub fn insert(&mut self, key: ObjectKey, bounds: AABB, config: &OctreeConfig) {
        if self.is_leaf() && self.should_subdivide(config) {
            self.subdivide();
        }

        if let Some(octant) = self.child_index(&bounds) {
            if let Some(children) = self.children.as_mut() {
                children[octant].insert(key, bounds, config);
                return;
            }
        }

        self.entries.push((key, bounds));
    }

    /// Remove an object, following the path its bounds select
    pub fn remove(&mut self, key: ObjectKey, bounds: &AABB) -> bool {
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.swap_remove(index);
            return true;
        }

        match (self.child_index(bounds), self.children.as_mut()) {
            (Some(octant), Some(children)) => children[octant].remove(key, bounds),
            _ => false,
        }
    }

    /// Remove an object wherever it is stored
    fn remove_anywhere(&mut self, key: ObjectKey) -> bool {
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.swap_remove(index);
            return true;
        }

        self.children
            .as_mut()
            .is_some_and(|children| children.iter_mut().any(|child| child.remove_anywhere(key)))
    }

    /// Collect overlapping pairs in this subtree; `ancestors` holds the
    /// entries of every node on the path above this one
    fn collect_pairs(&self, ancestors: &mut Vec<(ObjectKey, AABB)>, out: &mut Vec<(ObjectKey, ObjectKey)>) {
        for (i, (a_key, a_bounds)) in self.entries.iter().enumerate() {
            for (b_key, b_bounds) in ancestors.iter().chain(self.entries.iter().skip(i + 1)) {
                if a_bounds.intersects(b_bounds) {
                    out.push((*a_key, *b_key));
                }
            }
        }

        if let Some(ref children) = self.children {
            let mark = ancestors.len();
            ancestors.extend_from_slice(&self.entries);
            for child in children.iter() {
                child.collect_pairs(ancestors, out);
            }
            ancestors.truncate(mark);
        }
    }

    /// Query all objects hit by a ray, skipping subtrees the ray misses
    pub fn query_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, results: &mut Vec<(ObjectKey, f32)>) {
        // The root also holds objects outside the world bounds, so it is always visited
        if self.depth > 0 && self.bounds.intersect_ray_within(origin, direction, max_distance).is_none() {
            return;
        }

        for (key, bounds) in &self.entries {
            if let Some(distance) = bounds.intersect_ray_within(origin, direction, max_distance) {
                results.push((*key, distance));
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_ray(origin, direction, max_distance, results);
            }
        }
    }

    /// Query all objects overlapping a box
    pub fn query_aabb(&self, query: &AABB, results: &mut Vec<ObjectKey>) {
        if self.depth > 0 && !self.bounds.intersects(query) {
            return;
        }

        results.extend(self.entries.iter().filter(|(_, b)| b.intersects(query)).map(|(key, _)| *key));

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_aabb(query, results);
            }
        }
    }

    /// Query all objects within a radius of a point
    pub fn query_sphere(&self, center: Vec3, radius_squared: f32, results: &mut Vec<ObjectKey>) {
        if self.depth > 0 && self.bounds.distance_squared_to_point(center) > radius_squared {
            return; // Sphere doesn't intersect this node
        }

        results.extend(
            self.entries
                .iter()
                .filter(|(_, b)| b.distance_squared_to_point(center) <= radius_squared)
                .map(|(key, _)| *key),
        );

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_sphere(center, radius_squared, results);
            }
        }
    }

    /// Count total objects in this node and all children
    pub fn count_objects(&self) -> usize {
        let mut count = self.entries.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_objects();
            }
        }

        count
    }

    /// Deepest depth reached below (and including) this node
    pub fn max_depth(&self) -> u32 {
        self.children
            .as_ref()
            .map_or(self.depth, |children| children.iter().map(OctreeNode::max_depth).max().unwrap_or(self.depth))
    }
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Octree {
    /// Root node containing the entire world space
    pub root: OctreeNode,

    /// Configuration
    config: OctreeConfig,

    /// Bounds of every stored object, used to find it again on removal
    bounds_by_key: HashMap<ObjectKey, AABB>,
}

impl Octree {
    /// Create a new octree with the configured world bounds
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::new(config.world_bounds, 0),
            config,
            bounds_by_key: HashMap::new(),
        }
    }

    /// The configuration this octree was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }
}

impl SpatialIndex for Octree {
    fn name(&self) -> &'static str {
        "octree"
    }

    fn insert(&mut self, key: ObjectKey, bounds: AABB) {
        if self.bounds_by_key.contains_key(&key) {
            self.remove(key);
        }
        self.root.insert(key, bounds, &self.config);
        self.bounds_by_key.insert(key, bounds);
    }

    fn remove(&mut self, key: ObjectKey) -> bool {
        let Some(bounds) = self.bounds_by_key.remove(&key) else {
            return false;
        };

        if self.root.remove(key, &bounds) {
            return true;
        }

        log::warn!("Octree entry for {key:?} was not on its expected path; searching all nodes");
        self.root.remove_anywhere(key)
    }

    fn overlapping_pairs(&self) -> Vec<(ObjectKey, ObjectKey)> {
        let mut out = Vec::new();
        let mut ancestors = Vec::new();
        self.root.collect_pairs(&mut ancestors, &mut out);
        out
    }

    fn query_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<(ObjectKey, f32)> {
        let mut results = Vec::new();
        self.root.query_ray(origin, direction, max_distance, &mut results);
        results
    }

    fn query_aabb(&self, bounds: &AABB) -> Vec<ObjectKey> {
        let mut results = Vec::new();
        self.root.query_aabb(bounds, &mut results);
        results
    }

    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectKey> {
        let mut results = Vec::new();
        self.root.query_sphere(center, radius * radius, &mut results);
        results
    }

    fn object_count(&self) -> usize {
        self.root.count_objects()
    }

    fn clear(&mut self) {
        self.root = OctreeNode::new(self.config.world_bounds, 0);
        self.bounds_by_key.clear();
    }
}

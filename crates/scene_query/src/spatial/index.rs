//! Pluggable spatial index behind the registry
//!
//! The registry mirrors every insert, remove and update into a
//! [`SpatialIndex`], and the query engines ask the index for exact answers.
//! Implementations may prune however they like (list, octree, grid, BVH), but
//! every implementation must return the same sets for the same contents.

use super::{ObjectKey, AABB};
use crate::foundation::math::Vec3;

/// Spatial partitioning structure queried by the intersection, ray and
/// region query engines
///
/// All answers are exact: results contain precisely the objects whose bounds
/// satisfy the test, never a conservative superset. Result order is
/// unspecified; callers impose their own deterministic order.
pub trait SpatialIndex: Send + Sync + std::fmt::Debug {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Add an object with its world-space bounds
    fn insert(&mut self, key: ObjectKey, bounds: AABB);

    /// Remove an object. Returns false if it was not present.
    fn remove(&mut self, key: ObjectKey) -> bool;

    /// Replace an object's bounds after it moved
    fn update(&mut self, key: ObjectKey, bounds: AABB) {
        self.remove(key);
        self.insert(key, bounds);
    }

    /// Every unordered pair of distinct objects whose bounds overlap (closed
    /// intervals), each pair exactly once
    fn overlapping_pairs(&self) -> Vec<(ObjectKey, ObjectKey)>;

    /// Objects hit by the ray within `max_distance`, with their entry
    /// distance. `direction` must be unit length.
    fn query_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<(ObjectKey, f32)>;

    /// Objects whose bounds overlap `bounds`
    fn query_aabb(&self, bounds: &AABB) -> Vec<ObjectKey>;

    /// Objects whose bounds come within `radius` of `center`
    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectKey>;

    /// Number of indexed objects
    fn object_count(&self) -> usize;

    /// Remove all objects
    fn clear(&mut self);
}

/// Simple list-based index (no spatial optimization)
///
/// Performs a linear scan for every query and an all-pairs sweep for
/// intersections. Serves as the reference the octree is checked against and
/// is sufficient for small scenes.
#[derive(Debug, Default)]
pub struct LinearIndex {
    /// List of objects with their bounding volumes
    entries: Vec<(ObjectKey, AABB)>,
}

impl LinearIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for LinearIndex {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn insert(&mut self, key: ObjectKey, bounds: AABB) {
        self.entries.push((key, bounds));
    }

    fn remove(&mut self, key: ObjectKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    fn update(&mut self, key: ObjectKey, bounds: AABB) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = bounds;
        } else {
            self.entries.push((key, bounds));
        }
    }

    fn overlapping_pairs(&self) -> Vec<(ObjectKey, ObjectKey)> {
        let mut pairs = Vec::new();
        for (i, (a_key, a_bounds)) in self.entries.iter().enumerate() {
            for (b_key, b_bounds) in self.entries.iter().skip(i + 1) {
                if a_bounds.intersects(b_bounds) {
                    pairs.push((*a_key, *b_key));
                }
            }
        }
        pairs
    }

    fn query_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<(ObjectKey, f32)> {
        self.entries
            .iter()
            .filter_map(|(key, bounds)| {
                bounds
                    .intersect_ray_within(origin, direction, max_distance)
                    .map(|distance| (*key, distance))
            })
            .collect()
    }

    fn query_aabb(&self, bounds: &AABB) -> Vec<ObjectKey> {
        self.entries
            .iter()
            .filter(|(_, b)| b.intersects(bounds))
            .map(|(key, _)| *key)
            .collect()
    }

    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectKey> {
        let radius_squared = radius * radius;
        self.entries
            .iter()
            .filter(|(_, bounds)| bounds.distance_squared_to_point(center) <= radius_squared)
            .map(|(key, _)| *key)
            .collect()
    }

    fn object_count(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

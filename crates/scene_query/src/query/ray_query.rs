//! Ray scene query

use super::{NameOrdering, QueryError, QueryFlags, Ray};
use crate::foundation::math::Vec3;
use crate::spatial::SpatialRegistry;
use std::cmp::Ordering;

/// An object hit by a ray
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Name of the object hit
    pub name: String,
    /// Distance along the normalized ray to the entry point, 0 when the ray
    /// starts inside the bounds
    pub distance: f32,
    /// World-space entry point
    pub point: Vec3,
}

/// Ordered list of ray hits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayQueryResult {
    hits: Vec<RayHit>,
}

impl RayQueryResult {
    /// Number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True when the ray hit nothing
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterate over the hits in result order
    pub fn iter(&self) -> std::slice::Iter<'_, RayHit> {
        self.hits.iter()
    }

    /// The hits as a slice
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// The closest hit when sorted, otherwise the first hit
    pub fn first(&self) -> Option<&RayHit> {
        self.hits.first()
    }

    /// Names of the hits, in result order
    pub fn names(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.name.as_str()).collect()
    }
}

impl std::ops::Index<usize> for RayQueryResult {
    type Output = RayHit;

    fn index(&self, index: usize) -> &RayHit {
        &self.hits[index]
    }
}

impl IntoIterator for RayQueryResult {
    type Item = RayHit;
    type IntoIter = std::vec::IntoIter<RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a RayQueryResult {
    type Item = &'a RayHit;
    type IntoIter = std::slice::Iter<'a, RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// Finds every registered object whose bounds a ray passes through
///
/// Unsorted results follow registry insertion order and are never truncated.
/// With sorting enabled, hits are ordered by ascending distance (ties by
/// name) and limited to `max_results`, where 0 means no limit.
#[derive(Debug, Clone, PartialEq)]
pub struct RayQuery {
    ray: Ray,
    sort_by_distance: bool,
    max_results: usize,
    max_distance: f32,
    query_mask: QueryFlags,
    ordering: NameOrdering,
}

impl RayQuery {
    /// Create an unsorted, unbounded query along `ray`
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            sort_by_distance: false,
            max_results: 0,
            max_distance: f32::INFINITY,
            query_mask: QueryFlags::all(),
            ordering: NameOrdering::default(),
        }
    }

    /// Builder: only report hits within `distance` of the origin
    ///
    /// Must be non-negative; infinity means unbounded.
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Builder: only objects whose flags share a bit with `mask` are hit
    pub fn with_query_mask(mut self, mask: QueryFlags) -> Self {
        self.query_mask = mask;
        self
    }

    /// Builder: name ordering used to break distance ties
    pub fn with_ordering(mut self, ordering: NameOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Replace the ray, keeping every other setting
    pub fn set_ray(&mut self, ray: Ray) {
        self.ray = ray;
    }

    /// The ray as given, before normalization
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Enable or disable distance sorting; `max_results` of 0 means unlimited
    pub fn set_sort_by_distance(&mut self, enabled: bool, max_results: usize) {
        self.sort_by_distance = enabled;
        self.max_results = max_results;
    }

    /// Whether results are sorted by distance
    pub fn sort_by_distance(&self) -> bool {
        self.sort_by_distance
    }

    /// Result limit for sorted queries, 0 for none
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Replace the query mask
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Run the query against the registry's current contents
    ///
    /// Fails with [`QueryError::InvalidRay`] for a degenerate ray and
    /// [`QueryError::InvalidMaxDistance`] for a negative or NaN range.
    pub fn execute(&self, registry: &SpatialRegistry) -> Result<RayQueryResult, QueryError> {
        let ray = self.ray.normalized()?;
        if self.max_distance.is_nan() || self.max_distance < 0.0 {
            return Err(QueryError::InvalidMaxDistance(self.max_distance));
        }

        let mut candidates: Vec<_> = registry
            .index()
            .query_ray(ray.origin, ray.direction, self.max_distance)
            .into_iter()
            .filter_map(|(key, distance)| {
                let object = registry.object(key)?;
                object.query_flags.matches(self.query_mask).then_some((object, distance))
            })
            .collect();

        if self.sort_by_distance {
            candidates.sort_by(|(a, da), (b, db)| {
                da.partial_cmp(db)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| self.ordering.compare(&a.name, &b.name))
            });
            if self.max_results > 0 {
                candidates.truncate(self.max_results);
            }
        } else {
            candidates.sort_by_key(|(object, _)| object.sequence);
        }

        let hits: Vec<RayHit> = candidates
            .into_iter()
            .map(|(object, distance)| RayHit {
                name: object.name.clone(),
                distance,
                point: ray.point_at(distance),
            })
            .collect();

        log::debug!(
            "Ray query from {:?} along {:?} hit {} objects",
            ray.origin,
            ray.direction,
            hits.len()
        );
        Ok(RayQueryResult { hits })
    }
}

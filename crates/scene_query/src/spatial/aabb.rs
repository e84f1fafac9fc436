//! Axis-aligned bounding boxes and the bounds provider seam

use crate::foundation::math::{utils, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box for spatial queries
///
/// All tests treat the box as closed: faces that merely touch count as
/// overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Cube of half-size `half_size` centered on the origin
    pub fn cube(half_size: f32) -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::new(half_size, half_size, half_size))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True when min <= max on every axis and all corners are finite
    pub fn is_valid(&self) -> bool {
        utils::is_finite(&self.min)
            && utils::is_finite(&self.max)
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies strictly inside this box, touching no face
    pub fn contains_strictly(&self, other: &AABB) -> bool {
        other.min.x > self.min.x && other.max.x < self.max.x &&
        other.min.y > self.min.y && other.max.y < self.max.y &&
        other.min.z > self.min.z && other.max.z < self.max.z
    }

    /// Check if this AABB intersects another AABB (closed intervals)
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && other.min.x <= self.max.x &&
        self.min.y <= other.max.y && other.min.y <= self.max.y &&
        self.min.z <= other.max.z && other.min.z <= self.max.z
    }

    /// The box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box containing both boxes
    pub fn merged(&self, other: &AABB) -> Self {
        Self {
            min: utils::component_min(&self.min, &other.min),
            max: utils::component_max(&self.max, &other.max),
        }
    }

    /// Squared distance from `point` to the closest point of the box
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        let closest_point = Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        );
        (closest_point - point).magnitude_squared()
    }

    /// Slab test returning the parametric interval `(t_enter, t_exit)` over
    /// which the infinite line `origin + t * direction` is inside the box.
    ///
    /// A zero direction component is handled exactly: the line is inside that
    /// slab for every `t` when the origin lies within it, and never otherwise.
    pub fn ray_interval(&self, origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point if the ray (t >= 0) hits the
    /// box, or 0 when the origin is inside it.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        self.intersect_ray_within(ray_origin, ray_dir, f32::INFINITY)
    }

    /// Like [`AABB::intersect_ray`], but the box must be reached within
    /// `max_distance` (inclusive) of the origin.
    pub fn intersect_ray_within(&self, ray_origin: Vec3, ray_dir: Vec3, max_distance: f32) -> Option<f32> {
        match self.ray_interval(ray_origin, ray_dir) {
            Some((t_enter, t_exit)) if t_exit >= 0.0 && t_enter <= max_distance => Some(t_enter.max(0.0)),
            _ => None,
        }
    }
}

/// Supplies the world-space bounding volume of a positioned object
///
/// Scene objects only carry a translation, so the default world bounds are
/// the local bounds moved to the object's position.
pub trait BoundsProvider {
    /// Bounds in the object's local space
    fn local_bounds(&self) -> AABB;

    /// Bounds in world space for an object placed at `position`
    fn world_bounds(&self, position: Vec3) -> AABB {
        self.local_bounds().translated(position)
    }
}

impl BoundsProvider for AABB {
    fn local_bounds(&self) -> AABB {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = AABB::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(aabb2.intersects(&aabb1));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_touching_faces_overlap() {
        let left = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let right = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let corner = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0));

        assert!(left.intersects(&right));
        assert!(left.intersects(&corner));
        assert!(!left.contains_strictly(&left));
    }

    #[test]
    fn test_world_bounds_translate_local_bounds() {
        let local = AABB::cube(100.0);
        let world = local.world_bounds(Vec3::new(10.0, -20.0, 30.0));
        assert_eq!(world.min, Vec3::new(-90.0, -120.0, -70.0));
        assert_eq!(world.max, Vec3::new(110.0, 80.0, 130.0));
    }

    #[test]
    fn test_ray_entry_distance() {
        let aabb = AABB::cube(1.0);
        let hit = aabb.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(hit.unwrap(), 4.0);
    }

    #[test]
    fn test_ray_from_inside_is_zero() {
        let aabb = AABB::cube(1.0);
        let hit = aabb.intersect_ray(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hit, Some(0.0));
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let aabb = AABB::cube(1.0);
        assert!(aabb.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0)).is_none());
        assert!(aabb.intersect_ray(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_ray_range_limit() {
        let aabb = AABB::cube(1.0);
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        assert!(aabb.intersect_ray_within(origin, dir, 3.9).is_none());
        assert_eq!(aabb.intersect_ray_within(origin, dir, 4.0), Some(4.0));
    }

    #[test]
    fn test_ray_grazing_face_hits() {
        let aabb = AABB::cube(1.0);
        // Travels exactly along the x = 1 face
        let hit = aabb.intersect_ray(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(hit.unwrap(), 4.0);
    }

    #[test]
    fn test_merged_and_validity() {
        let a = AABB::cube(1.0);
        let b = AABB::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        let m = a.merged(&b);
        assert_eq!(m.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(m.max, Vec3::new(3.0, 3.0, 3.0));
        assert!(m.is_valid());
        assert!(!AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros()).is_valid());
    }
}

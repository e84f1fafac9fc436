//! Rays for ray queries and picking

use super::QueryError;
use crate::foundation::math::{utils, Vec3};

/// A ray `origin + t * direction`, `t >= 0`
///
/// The direction is stored as given. Queries validate and normalize it, so a
/// degenerate ray is reported as [`QueryError::InvalidRay`] instead of
/// producing NaN distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `start` and passing through `end`
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the origin is finite and the direction is finite and non-zero
    pub fn is_valid(&self) -> bool {
        utils::is_finite(&self.origin)
            && utils::is_finite(&self.direction)
            && self.direction.magnitude_squared() > f32::MIN_POSITIVE
    }

    /// Copy of this ray with a unit-length direction
    pub fn normalized(&self) -> Result<Self, QueryError> {
        if !self.is_valid() {
            return Err(QueryError::InvalidRay);
        }
        Ok(Self {
            origin: self.origin,
            direction: self.direction.normalize(),
        })
    }
}

//! Scene queries
//!
//! Intersection, ray and region queries run against a
//! [`SpatialRegistry`](crate::spatial::SpatialRegistry). Every query returns an
//! owned, deterministically ordered result; nothing borrows registry storage
//! past the call to `execute`.

pub mod flags;
pub mod intersection;
pub mod ordering;
pub mod ray;
pub mod ray_query;
pub mod region;

pub use flags::QueryFlags;
pub use intersection::{IntersectionPair, IntersectionQuery, IntersectionResult};
pub use ordering::NameOrdering;
pub use ray::Ray;
pub use ray_query::{RayHit, RayQuery, RayQueryResult};
pub use region::{Region, RegionQuery, RegionQueryResult};

use thiserror::Error;

/// Query errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Ray direction is zero-length or not finite
    #[error("Ray direction must be finite and non-zero")]
    InvalidRay,

    /// Ray query range is negative or NaN
    #[error("Ray query max distance must be non-negative, got {0}")]
    InvalidMaxDistance(f32),

    /// Query region is malformed
    #[error("Invalid query region: {0}")]
    InvalidRegion(String),
}

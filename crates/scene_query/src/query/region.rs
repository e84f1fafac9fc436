//! Box and sphere region queries

use super::{QueryError, QueryFlags};
use crate::foundation::math::{utils, Vec3};
use crate::spatial::{SpatialRegistry, AABB};

/// Volume a region query searches
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// Axis-aligned box (closed)
    Aabb(AABB),
    /// Sphere (closed)
    Sphere {
        /// Sphere center in world space
        center: Vec3,
        /// Must be finite and non-negative
        radius: f32,
    },
}

impl Region {
    fn validate(&self) -> Result<(), QueryError> {
        match self {
            Region::Aabb(bounds) if !bounds.is_valid() => Err(QueryError::InvalidRegion(format!(
                "box min {:?} exceeds max {:?} or is not finite",
                bounds.min, bounds.max
            ))),
            Region::Sphere { center, radius } if !utils::is_finite(center) || !radius.is_finite() || *radius < 0.0 => {
                Err(QueryError::InvalidRegion(format!("sphere radius {radius} at {center:?}")))
            }
            _ => Ok(()),
        }
    }
}

/// Names of the objects inside a region, in registry insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionQueryResult {
    names: Vec<String>,
}

impl RegionQueryResult {
    /// Number of objects found
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the region contains nothing
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Object names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` was found
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Finds registered objects whose bounds overlap a box or sphere
#[derive(Debug, Clone, PartialEq)]
pub struct RegionQuery {
    region: Region,
    query_mask: QueryFlags,
}

impl RegionQuery {
    /// Query `region` with a mask that matches everything
    pub fn new(region: Region) -> Self {
        Self {
            region,
            query_mask: QueryFlags::all(),
        }
    }

    /// Query a box
    pub fn aabb(bounds: AABB) -> Self {
        Self::new(Region::Aabb(bounds))
    }

    /// Query a sphere
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::new(Region::Sphere { center, radius })
    }

    /// Builder: only objects whose flags share a bit with `mask` are reported
    pub fn with_query_mask(mut self, mask: QueryFlags) -> Self {
        self.query_mask = mask;
        self
    }

    /// The region being searched
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Run the query against the registry's current contents
    pub fn execute(&self, registry: &SpatialRegistry) -> Result<RegionQueryResult, QueryError> {
        self.region.validate()?;

        let keys = match self.region {
            Region::Aabb(bounds) => registry.index().query_aabb(&bounds),
            Region::Sphere { center, radius } => registry.index().query_sphere(center, radius),
        };

        let mut objects: Vec<_> = keys
            .into_iter()
            .filter_map(|key| registry.object(key))
            .filter(|object| object.query_flags.matches(self.query_mask))
            .collect();
        objects.sort_by_key(|object| object.sequence);

        let names: Vec<String> = objects.into_iter().map(|object| object.name.clone()).collect();
        log::debug!("Region query {:?} found {} objects", self.region, names.len());
        Ok(RegionQueryResult { names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::SpatialObject;

    fn registry() -> SpatialRegistry {
        let mut registry = SpatialRegistry::default();
        for (name, x) in [("c", 10.0), ("a", 0.0), ("b", 5.0)] {
            registry
                .insert(SpatialObject::new(name, Vec3::new(x, 0.0, 0.0), &AABB::cube(1.0)))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_box_query_in_insertion_order() {
        let bounds = AABB::new(Vec3::new(-2.0, -1.0, -1.0), Vec3::new(9.0, 1.0, 1.0));
        let result = RegionQuery::aabb(bounds).execute(&registry()).unwrap();
        assert_eq!(result.names(), ["c", "a", "b"]);
    }

    #[test]
    fn test_sphere_query() {
        let result = RegionQuery::sphere(Vec3::new(2.5, 0.0, 0.0), 1.5).execute(&registry()).unwrap();
        assert_eq!(result.names(), ["a", "b"]);
        assert!(!result.contains("c"));
    }

    #[test]
    fn test_invalid_regions() {
        let registry = registry();
        let inverted = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        assert!(matches!(
            RegionQuery::aabb(inverted).execute(&registry),
            Err(QueryError::InvalidRegion(_))
        ));
        assert!(RegionQuery::sphere(Vec3::zeros(), -1.0).execute(&registry).is_err());
        assert!(RegionQuery::sphere(Vec3::zeros(), f32::NAN).execute(&registry).is_err());
    }

    #[test]
    fn test_mask() {
        let mut registry = registry();
        registry.set_query_flags("a", QueryFlags::TRIGGER).unwrap();
        registry.set_query_flags("b", QueryFlags::STATIC).unwrap();
        registry.set_query_flags("c", QueryFlags::STATIC | QueryFlags::DYNAMIC).unwrap();

        let triggers = RegionQuery::sphere(Vec3::zeros(), 100.0)
            .with_query_mask(QueryFlags::TRIGGER)
            .execute(&registry)
            .unwrap();
        assert_eq!(triggers.names(), ["a"]);

        // Default flags match every mask
        let mut registry = self::registry();
        registry.set_query_flags("a", QueryFlags::TRIGGER).unwrap();
        let all = RegionQuery::sphere(Vec3::zeros(), 100.0)
            .with_query_mask(QueryFlags::TRIGGER)
            .execute(&registry)
            .unwrap();
        assert_eq!(all.names(), ["c", "a", "b"]);
    }
}

//! # Engine Configuration
//!
//! Settings for the engine root and the scene managers it creates: log
//! level, which spatial index backs each scene, and the defaults applied to
//! queries created through a scene manager.
//!
//! Every struct uses `#[serde(default)]`, so a configuration file only needs
//! to name the values it changes.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::query::{NameOrdering, QueryFlags};
use crate::spatial::{LinearIndex, Octree, OctreeConfig, SpatialIndex};

/// Spatial index used by a scene's registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartitionConfig {
    /// Plain list, every query scans all objects
    Linear,
    /// Octree over the given world bounds
    Octree(OctreeConfig),
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::Octree(OctreeConfig::default())
    }
}

impl PartitionConfig {
    /// Build an empty index of this kind
    pub fn build_index(&self) -> Box<dyn SpatialIndex> {
        match self {
            Self::Linear => Box::new(LinearIndex::new()),
            Self::Octree(config) => Box::new(Octree::new(config.clone())),
        }
    }

    /// Check the partition settings for nonsensical values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self::Octree(config) = self else {
            return Ok(());
        };

        let bounds = config.world_bounds;
        if !bounds.is_valid() || bounds.extents().min() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "octree world bounds {:?}..{:?} must be finite with positive size",
                bounds.min, bounds.max
            )));
        }
        if config.max_objects_per_node == 0 {
            return Err(ConfigError::Invalid("octree max_objects_per_node must be at least 1".to_string()));
        }
        if config.max_depth > 32 {
            return Err(ConfigError::Invalid(format!(
                "octree max_depth {} exceeds 32",
                config.max_depth
            )));
        }
        if !config.min_node_size.is_finite() || config.min_node_size < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "octree min_node_size {} must be finite and non-negative",
                config.min_node_size
            )));
        }
        Ok(())
    }
}

/// # Scene Configuration
///
/// Applied to every scene manager the root creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Spatial index backing the scene's registry
    pub partition: PartitionConfig,
    /// Name ordering of query results
    pub name_ordering: NameOrdering,
    /// Query mask given to queries created by the scene manager
    pub default_query_mask: u32,
}

impl SceneConfig {
    /// Create the default scene configuration
    pub fn new() -> Self {
        Self {
            partition: PartitionConfig::default(),
            name_ordering: NameOrdering::default(),
            default_query_mask: u32::MAX,
        }
    }

    /// Set the spatial index
    pub fn with_partition(mut self, partition: PartitionConfig) -> Self {
        self.partition = partition;
        self
    }

    /// Set the result name ordering
    pub fn with_name_ordering(mut self, ordering: NameOrdering) -> Self {
        self.name_ordering = ordering;
        self
    }

    /// Set the default query mask
    pub fn with_default_query_mask(mut self, mask: QueryFlags) -> Self {
        self.default_query_mask = mask.bits();
        self
    }

    /// Default query mask as flags
    pub fn query_mask(&self) -> QueryFlags {
        QueryFlags::from_bits_retain(self.default_query_mask)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.partition.validate()
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Top-level configuration handed to [`Root`](crate::engine::Root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter for binaries that initialize logging from this config
    pub log_level: String,
    /// Settings for created scene managers
    pub scene: SceneConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            scene: SceneConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the scene configuration
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }
        self.scene.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::foundation::math::Vec3;
    use crate::spatial::AABB;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scene.query_mask(), QueryFlags::all());
        assert_eq!(config.scene.name_ordering, NameOrdering::Numeric);
    }

    #[test]
    fn test_parse_partial_toml() {
        let text = r#"
log_level = "debug"

[scene]
name_ordering = "Lexical"
partition = "Linear"
"#;
        let config = EngineConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.scene.name_ordering, NameOrdering::Lexical);
        assert_eq!(config.scene.partition, PartitionConfig::Linear);
        assert_eq!(config.scene.default_query_mask, u32::MAX);
        assert_eq!(config.scene.partition.build_index().name(), "linear");
    }

    #[test]
    fn test_parse_octree_ron() {
        let text = r#"(
    log_level: "warn",
    scene: (
        partition: Octree((
            world_bounds: (min: (-50.0, -50.0, -50.0), max: (50.0, 50.0, 50.0)),
            max_depth: 4,
        )),
    ),
)"#;
        let config = EngineConfig::from_str_with_format(text, ConfigFormat::Ron).unwrap();
        let PartitionConfig::Octree(octree) = &config.scene.partition else {
            panic!("expected octree partition");
        };
        assert_eq!(octree.max_depth, 4);
        assert_eq!(octree.max_objects_per_node, OctreeConfig::default().max_objects_per_node);
        assert_eq!(octree.world_bounds, AABB::cube(50.0));
        assert_eq!(config.scene.partition.build_index().name(), "octree");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::new()
            .with_log_level("trace")
            .with_scene(SceneConfig::new().with_default_query_mask(QueryFlags::PICKABLE));
        let text = config.to_string_with_format(ConfigFormat::Toml).unwrap();
        let parsed = EngineConfig::from_str_with_format(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_rejects_bad_octree() {
        let degenerate = OctreeConfig {
            world_bounds: AABB::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 10.0)),
            ..OctreeConfig::default()
        };
        let config = SceneConfig::new().with_partition(PartitionConfig::Octree(degenerate));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let empty_nodes = OctreeConfig {
            max_objects_per_node: 0,
            ..OctreeConfig::default()
        };
        let config = SceneConfig::new().with_partition(PartitionConfig::Octree(empty_nodes));
        assert!(config.validate().is_err());

        assert!(EngineConfig::new().with_log_level(" ").validate().is_err());
    }
}

//! Core engine configuration
//!
//! Configuration structures for the engine root and its scene managers,
//! loadable from TOML or RON through the [`Config`] trait.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, PartitionConfig, SceneConfig};

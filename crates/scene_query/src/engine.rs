//! Engine root
//!
//! The [`Root`] owns the configuration and every scene manager. It has no
//! render system; it exists so scenes can be created, queried and torn down
//! with a well defined lifecycle.

use crate::config::ConfigError;
use crate::core::{Config, EngineConfig};
use crate::scene::SceneManager;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Engine root: creates and owns scene managers
#[derive(Debug)]
pub struct Root {
    config: EngineConfig,
    scene_managers: BTreeMap<String, SceneManager>,
    next_instance: u64,
    shut_down: bool,
}

impl Root {
    /// Create a new root from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing scene query root...");
        Ok(Self {
            config,
            scene_managers: BTreeMap::new(),
            next_instance: 0,
            shut_down: false,
        })
    }

    /// Create a root from a TOML or RON configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        log::info!("Loading engine configuration from {}", path.display());
        Self::new(EngineConfig::load_from_file(path)?)
    }

    /// The configuration this root was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a scene manager with a generated unique name
    pub fn create_scene_manager(&mut self) -> Result<&mut SceneManager, EngineError> {
        let mut name = format!("SceneManagerInstance{}", self.next_instance);
        while self.scene_managers.contains_key(&name) {
            self.next_instance += 1;
            name = format!("SceneManagerInstance{}", self.next_instance);
        }
        self.create_named_scene_manager(name)
    }

    /// Create a scene manager with the given name
    pub fn create_named_scene_manager(&mut self, name: impl Into<String>) -> Result<&mut SceneManager, EngineError> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        let name = name.into();
        if self.scene_managers.contains_key(&name) {
            return Err(EngineError::DuplicateSceneManager(name));
        }

        self.next_instance += 1;
        log::info!("Creating scene manager '{name}'");
        let manager = SceneManager::new(name.clone(), self.config.scene.clone());
        Ok(self.scene_managers.entry(name).or_insert(manager))
    }

    /// Look up a scene manager
    pub fn scene_manager(&self, name: &str) -> Result<&SceneManager, EngineError> {
        self.scene_managers
            .get(name)
            .ok_or_else(|| EngineError::SceneManagerNotFound(name.to_string()))
    }

    /// Look up a scene manager for modification
    pub fn scene_manager_mut(&mut self, name: &str) -> Result<&mut SceneManager, EngineError> {
        self.scene_managers
            .get_mut(name)
            .ok_or_else(|| EngineError::SceneManagerNotFound(name.to_string()))
    }

    /// Names of the live scene managers
    pub fn scene_manager_names(&self) -> impl Iterator<Item = &str> {
        self.scene_managers.keys().map(String::as_str)
    }

    /// Destroy a scene manager and everything in it
    pub fn destroy_scene_manager(&mut self, name: &str) -> Result<(), EngineError> {
        self.scene_managers
            .remove(name)
            .map(|_| log::info!("Destroyed scene manager '{name}'"))
            .ok_or_else(|| EngineError::SceneManagerNotFound(name.to_string()))
    }

    /// Destroy all scene managers; later calls do nothing
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        log::info!("Shutting down ({} scene managers)", self.scene_managers.len());
        for (_, mut manager) in std::mem::take(&mut self.scene_managers) {
            manager.clear_scene();
        }
        self.shut_down = true;
    }

    /// True once [`Root::shutdown`] has run
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The root has been shut down
    #[error("The engine root has been shut down")]
    ShutDown,

    /// A scene manager with this name already exists
    #[error("Scene manager '{0}' already exists")]
    DuplicateSceneManager(String),

    /// No scene manager with this name exists
    #[error("Scene manager '{0}' does not exist")]
    SceneManagerNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

//! Configuration loading and saving utilities.

use crate::config::{Config, ConfigError};
use std::path::Path;

/// Configuration loader/saver
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_from_file(&self, path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.load_from_str(&content)
    }

    pub fn load_from_str(&self, content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, config: &Config, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

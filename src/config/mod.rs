//! Configuration management for the correction engine.
//!
//! This module handles the TOML configuration file: AI service settings,
//! circuit breaker thresholds, validation tuning and the injectable
//! command-knowledge tables (subcommand-aware commands, known commands,
//! base-command typos, extra command metadata).

pub mod loader;
pub mod validation;

use crate::command::DEFAULT_SUBCOMMAND_COMMANDS;
use crate::validation::similarity::DEFAULT_MEMO_CAPACITY;
use crate::validation::DEFAULT_UNIVERSAL_FLAGS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub ai: AIConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub validation: ValidationConfig,
    pub parser: ParserConfig,
    pub fallback: FallbackConfig,
    /// Extra metadata merged over the built-in table, keyed by base command
    pub commands: HashMap<String, CommandMetadataConfig>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

/// AI service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub backoff_base_ms: u64,
    pub backoff_factor: u32,
    pub backoff_max_ms: u64,
    pub temperature: f64,
    pub max_tokens: usize,
    /// Ask for a bare base-command correction before full validation
    pub quick_correction: bool,
}

/// Circuit breaker thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub cooldown_seconds: u64,
}

/// Structural validation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub memo_capacity: usize,
    pub universal_flags: Vec<String>,
}

/// Tokenizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub subcommand_commands: Vec<String>,
}

/// Static fallback table used when the AI tier is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub known_commands: Vec<String>,
    pub base_typos: HashMap<String, String>,
}

/// Metadata for one base command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandMetadataConfig {
    pub subcommands: Vec<String>,
    pub flags: Vec<String>,
}

/// Configuration manager
#[derive(Debug)]
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
    loader: loader::ConfigLoader,
    validator: validation::ConfigValidator,
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ConfigManager {
    /// Create a new configuration manager.
    ///
    /// Without an explicit path the platform config directory is used; a
    /// missing file there yields the defaults. An explicit path must exist.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit = config_path.is_some();
        let config_path = config_path.unwrap_or_else(Self::default_path);

        let loader = loader::ConfigLoader::new();
        let validator = validation::ConfigValidator::new();

        let config = if config_path.exists() {
            loader.load_from_file(&config_path)?
        } else if explicit {
            return Err(ConfigError::FileNotFound(config_path));
        } else {
            Config::default()
        };
        validator.validate(&config)?;

        Ok(Self {
            config,
            config_path,
            loader,
            validator,
        })
    }

    /// `<config dir>/shellsense/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellsense")
            .join("config.toml")
    }

    /// Load configuration from file
    pub fn load(&mut self) -> Result<(), ConfigError> {
        if self.config_path.exists() {
            let config = self.loader.load_from_file(&self.config_path)?;
            self.validator.validate(&config)?;
            self.config = config;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.loader.save_to_file(&self.config, &self.config_path)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Update a configuration value
    pub fn update<F>(&mut self, updater: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let mut candidate = self.config.clone();
        updater(&mut candidate);
        self.validator.validate(&candidate)?;
        self.config = candidate;
        Ok(())
    }

    /// Reset to default configuration
    pub fn reset_to_default(&mut self) {
        self.config = Config::default();
    }

    /// Export configuration as JSON
    pub fn export_as_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            backoff_base_ms: 1_000,
            backoff_factor: 2,
            backoff_max_ms: 8_000,
            temperature: 0.1,
            max_tokens: 256,
            quick_correction: true,
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_seconds: 60,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            universal_flags: DEFAULT_UNIVERSAL_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            subcommand_commands: DEFAULT_SUBCOMMAND_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            known_commands: DEFAULT_KNOWN_COMMANDS.iter().map(|s| s.to_string()).collect(),
            base_typos: default_base_typos(),
        }
    }
}

/// Commands the static fallback accepts without further checks
pub const DEFAULT_KNOWN_COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "cat", "less", "more", "head", "tail", "cp", "mv", "rm", "mkdir", "rmdir",
    "touch", "chmod", "chown", "ln", "find", "grep", "sed", "awk", "sort", "uniq", "wc", "cut",
    "tr", "xargs", "tee", "echo", "printf", "env", "export", "source", "which", "man", "ps",
    "top", "htop", "kill", "df", "du", "free", "tar", "zip", "unzip", "gzip", "curl", "wget",
    "ssh", "scp", "rsync", "ping", "vim", "vi", "nano", "code", "make", "python", "python3",
    "node", "java", "git", "docker", "docker-compose", "podman", "kubectl", "helm", "npm",
    "yarn", "pnpm", "cargo", "rustc", "go", "pip", "pip3", "apt", "apt-get", "brew", "dnf",
    "yum", "systemctl", "journalctl", "gh", "terraform", "sudo", "history", "clear", "exit",
];

/// Default base-command typo table
fn default_base_typos() -> HashMap<String, String> {
    let mut typos = HashMap::new();

    for (typo, fix) in [
        ("gti", "git"),
        ("got", "git"),
        ("gut", "git"),
        ("sl", "ls"),
        ("sls", "ls"),
        ("cd..", "cd .."),
        ("dokcer", "docker"),
        ("dcoker", "docker"),
        ("docekr", "docker"),
        ("kubeclt", "kubectl"),
        ("kubctl", "kubectl"),
        ("nmp", "npm"),
        ("pyhton", "python"),
        ("pytohn", "python"),
        ("grpe", "grep"),
        ("mkdri", "mkdir"),
        ("claer", "clear"),
        ("cagro", "cargo"),
    ] {
        typos.insert(typo.to_string(), fix.to_string());
    }

    typos
}

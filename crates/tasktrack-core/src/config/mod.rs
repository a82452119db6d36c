//! Configuration management for tasktrack.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `tasktrack.toml` file
//! 3. User config `~/.config/tasktrack/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data file location.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./tasktrack.toml` (project local)
    /// 2. `~/.config/tasktrack/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            self.storage.data_dir = dir;
        }
        if let Ok(file) = std::env::var(ENV_DATA_FILE) {
            self.storage.data_file = file;
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.data_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data file (default: ".tasktrack").
    pub data_dir: String,

    /// Data file name inside `data_dir`.
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the data file.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.data_file)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Tracing filter directive, e.g. "info" or "tasktrack_core=debug".
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
        assert_eq!(config.storage.data_file, DEFAULT_DATA_FILE);
        assert_eq!(config.log.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_data_path() {
        let config = StorageConfig {
            data_dir: "/tmp/tracker".to_string(),
            data_file: "data.txt".to_string(),
        };
        assert_eq!(config.data_path(), PathBuf::from("/tmp/tracker/data.txt"));
    }
}

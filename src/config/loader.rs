//! Configuration loading and saving utilities.

use crate::config::{ConfigError, EngineConfig};
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_ADVISORY_ENDPOINT: &str = "INFRAGRAPH_ADVISORY_ENDPOINT";
pub const ENV_ADVISORY_MODEL: &str = "INFRAGRAPH_ADVISORY_MODEL";
pub const ENV_LOG_LEVEL: &str = "INFRAGRAPH_LOG_LEVEL";

/// Configuration loader/saver
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// `<config dir>/infragraph/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("infragraph")
            .join("config.toml")
    }

    pub fn load_from_file(&self, path: &Path) -> Result<EngineConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, config: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` (or the default path) and apply environment overrides.
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(&self, path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
        let mut config = match path {
            Some(path) => self.load_from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    self.load_from_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "no config file, using defaults");
                    EngineConfig::default()
                }
            }
        };
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&self, config: &mut EngineConfig) -> Result<(), ConfigError> {
        self.apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(&self, config: &mut EngineConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ADVISORY_ENDPOINT) {
            let endpoint = endpoint.trim();
            config.advisory.endpoint = if endpoint.is_empty() {
                None
            } else {
                Some(endpoint.to_string())
            };
        }
        if let Some(model) = lookup(ENV_ADVISORY_MODEL) {
            config.advisory.model = model.trim().to_string();
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level
                .parse::<LogLevel>()
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", ENV_LOG_LEVEL, e)))?;
        }
        Ok(())
    }
}

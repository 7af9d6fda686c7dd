//! Engine configuration.
//!
//! Configuration is read from TOML, layered as defaults, then the config
//! file, then `INFRAGRAPH_*` environment variables, then CLI flags.

pub mod loader;
pub mod validation;

use crate::advisory::{AdvisoryAdapter, AdvisoryError, OllamaChatService, OllamaConfig};
use crate::codegen::TargetFormat;
use crate::logging::LogConfig;
use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LogConfig,
    pub advisory: AdvisoryConfig,
    pub validation: ValidationConfig,
    pub codegen: CodegenConfig,
}

/// Advisory chat service settings. No endpoint means advisory is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub endpoint: Option<String>,
    pub model: String,
    /// Overall deadline for one advisory request
    pub deadline_secs: u64,
    pub max_tokens: u32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: OllamaConfig::default().model,
            deadline_secs: AdvisoryAdapter::DEFAULT_DEADLINE.as_secs(),
            max_tokens: 2000,
        }
    }
}

impl AdvisoryConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Adapter for these settings; disabled when no endpoint is set
    pub fn build_adapter(&self) -> Result<AdvisoryAdapter, AdvisoryError> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(AdvisoryAdapter::disabled());
        };

        let service = OllamaChatService::new(OllamaConfig {
            endpoint: endpoint.clone(),
            model: self.model.clone(),
            timeout: self.deadline(),
        })?;

        Ok(AdvisoryAdapter::new(Arc::new(service))
            .with_deadline(self.deadline())
            .with_max_tokens(self.max_tokens))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub default_target: TargetFormat,
    /// Where `generate` writes documents when `--out` is not given
    pub output_dir: Option<PathBuf>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            default_target: TargetFormat::Terraform,
            output_dir: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),
}

//! Configuration validation utilities.

use crate::config::{ConfigError, EngineConfig};

fn validate_advisory(config: &EngineConfig) -> Result<(), ConfigError> {
    let advisory = &config.advisory;
    if advisory.deadline_secs == 0 {
        return Err(ConfigError::ValidationError(
            "advisory.deadline_secs must be greater than zero".to_string(),
        ));
    }
    if advisory.max_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "advisory.max_tokens must be greater than zero".to_string(),
        ));
    }
    if let Some(endpoint) = &advisory.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "advisory.endpoint '{}' must be an http(s) URL",
                endpoint
            )));
        }
        if advisory.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "advisory.model must be set when an endpoint is configured".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_cost_thresholds(config: &EngineConfig) -> Result<(), ConfigError> {
    let validation = &config.validation;
    if validation.monthly_cost_ceiling.is_nan() || validation.monthly_cost_ceiling <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "validation.monthly_cost_ceiling must be positive, got {}",
            validation.monthly_cost_ceiling
        )));
    }
    let ratio = validation.cost_warning_ratio;
    if ratio.is_nan() || ratio <= 0.0 || ratio > 1.0 {
        return Err(ConfigError::ValidationError(format!(
            "validation.cost_warning_ratio must be in (0, 1], got {}",
            validation.cost_warning_ratio
        )));
    }
    Ok(())
}

type Check = fn(&EngineConfig) -> Result<(), ConfigError>;

/// Runs every configuration check and stops at the first failure
pub struct ConfigValidator {
    checks: Vec<Check>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self {
            checks: vec![validate_advisory, validate_cost_thresholds],
        }
    }

    pub fn validate(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        for check in &self.checks {
            check(config)?;
        }
        Ok(())
    }
}

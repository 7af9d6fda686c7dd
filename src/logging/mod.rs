//! Tracing subscriber setup.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid filter directive: {0}")]
    InvalidDirective(String),

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Builds the `EnvFilter` for a config. `RUST_LOG` takes precedence when set.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    let mut filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => EnvFilter::try_new(value)
            .map_err(|e| LoggingError::InvalidDirective(e.to_string()))?,
        _ => EnvFilter::new(config.level.as_filter()),
    };

    for directive in &config.directives {
        let parsed = directive
            .parse()
            .map_err(|_| LoggingError::InvalidDirective(directive.clone()))?;
        filter = filter.add_directive(parsed);
    }
    Ok(filter)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// report `Install` and leave the first subscriber in place.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_targets)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Text => builder.with_ansi(config.ansi).try_init(),
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
    };
    result.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_is_rejected() {
        let config = LogConfig {
            directives: vec!["infragraph=[".to_string()],
            ..LogConfig::default()
        };
        assert!(matches!(
            build_filter(&config),
            Err(LoggingError::InvalidDirective(_))
        ));
    }

    #[test]
    fn test_repeated_init_does_not_panic() {
        let config = LogConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}

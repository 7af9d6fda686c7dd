//! Crate-level error type.
//!
//! Each engine keeps its own `thiserror` enum; `EngineError` aggregates them
//! for callers that drive several engines (the CLI, the config loader).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Graph error: {0}")]
    Graph(#[from] crate::graph::GraphError),

    #[error("Code generation error: {0}")]
    Codegen(#[from] crate::codegen::CodegenError),

    #[error(transparent)]
    Generation(#[from] crate::codegen::GenerationFailure),

    #[error("Advisory error: {0}")]
    Advisory(#[from] crate::advisory::AdvisoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    UnknownFramework(#[from] crate::rules::UnknownFramework),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the error comes from bad user input rather than the engine
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EngineError::Graph(_)
                | EngineError::UnknownFramework(_)
                | EngineError::InvalidInput { .. }
                | EngineError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: EngineError = "bicep"
            .parse::<crate::codegen::TargetFormat>()
            .unwrap_err()
            .into();
        assert!(matches!(err, EngineError::Codegen(_)));
        assert!(err.to_string().contains("bicep"));

        let err: EngineError = "iso27001"
            .parse::<crate::rules::Framework>()
            .unwrap_err()
            .into();
        assert!(err.is_user_error());
    }
}

// Infrastructure graph analysis library
//
// Loads a graph of cloud components, scores it against compliance
// frameworks and heuristics, runs deterministic infrastructure tests and
// generates infrastructure-as-code for several targets.

pub mod advisory;
pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod rules;
pub mod validation;

// Re-export commonly used types
pub use advisory::{analyze_with_advisory, AdvisoryAdapter, ChatService};
pub use codegen::{generate, GeneratedArtifact, GenerationFailure, TargetFormat};
pub use config::{ConfigError, ConfigLoader, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use graph::{Edge, InfraGraph, Node};
pub use rules::{
    evaluate_all_frameworks, evaluate_framework, evaluate_heuristics, ComplianceReport, Finding,
    Framework, Severity,
};
pub use validation::{run_tests, InfrastructureTest, TestStatus};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

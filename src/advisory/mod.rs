//! Best-effort advisory findings from an external chat model.
//!
//! The adapter is the only part of the engine that performs I/O. Every
//! failure on this path (no service configured, transport error, deadline
//! expiry, a response without a JSON array, malformed JSON) is logged and
//! degrades to zero findings. There are no retries.

pub mod extract;
pub mod ollama;
pub mod summary;

use crate::graph::InfraGraph;
use crate::rules::{evaluate_heuristics, Finding};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub use extract::{extract_json_array, parse_findings};
pub use ollama::{OllamaChatService, OllamaConfig};
pub use summary::GraphSummary;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Chat-completion collaborator. `Ok(None)` means the service answered
/// without any text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
    ) -> Result<Option<String>, AdvisoryError>;
}

const SYSTEM_PROMPT: &str = "You are a cloud infrastructure reviewer. \
Analyse the infrastructure graph you are given for security, cost, reliability \
and performance problems. Respond with a JSON array only. Each element must be \
an object with the fields: title, description, severity (critical, high, \
medium or low), affectedResources (array of node ids from the graph), \
remediation. Return [] when you find nothing.";

/// Wraps an optional chat service with a deadline
#[derive(Clone)]
pub struct AdvisoryAdapter {
    service: Option<Arc<dyn ChatService>>,
    deadline: Duration,
    max_tokens: u32,
}

impl AdvisoryAdapter {
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

    pub fn new(service: Arc<dyn ChatService>) -> Self {
        Self {
            service: Some(service),
            deadline: Self::DEFAULT_DEADLINE,
            max_tokens: ChatOptions::default().max_tokens,
        }
    }

    /// Adapter that always yields no findings
    pub fn disabled() -> Self {
        Self {
            service: None,
            deadline: Self::DEFAULT_DEADLINE,
            max_tokens: ChatOptions::default().max_tokens,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    /// Ask the chat service for findings. Never fails; every problem is
    /// logged and yields an empty list.
    pub async fn advisory_findings(&self, graph: &InfraGraph) -> Vec<Finding> {
        let Some(service) = &self.service else {
            debug!("advisory service not configured");
            return Vec::new();
        };

        let summary = GraphSummary::from_graph(graph);
        let summary_json = match serde_json::to_string_pretty(&summary) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize graph summary");
                return Vec::new();
            }
        };

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Infrastructure graph:\n{}", summary_json)),
        ];
        let options = ChatOptions {
            max_tokens: self.max_tokens,
            ..ChatOptions::default()
        };

        let response =
            match tokio::time::timeout(self.deadline, service.chat(messages, options)).await {
                Err(_) => {
                    warn!(deadline_ms = self.deadline.as_millis() as u64, "advisory request timed out");
                    return Vec::new();
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "advisory request failed");
                    return Vec::new();
                }
                Ok(Ok(None)) => {
                    debug!("advisory service returned no content");
                    return Vec::new();
                }
                Ok(Ok(Some(text))) => text,
            };

        let Some(array) = extract_json_array(&response) else {
            warn!("advisory response contained no JSON array");
            return Vec::new();
        };

        match parse_findings(array, graph) {
            Ok(findings) => {
                debug!(findings = findings.len(), "advisory findings parsed");
                findings
            }
            Err(err) => {
                warn!(error = %err, "advisory response was not valid JSON");
                Vec::new()
            }
        }
    }
}

/// Heuristic findings followed by advisory findings
pub async fn analyze_with_advisory(graph: &InfraGraph, adapter: &AdvisoryAdapter) -> Vec<Finding> {
    let mut findings = evaluate_heuristics(graph);
    findings.extend(adapter.advisory_findings(graph).await);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};
    use crate::rules::RuleCategory;

    fn graph() -> InfraGraph {
        InfraGraph::new(
            vec![Node::new("db", "aws-rds"), Node::new("vm", "aws-ec2")],
            vec![Edge::new("e", "vm", "db")],
        )
    }

    fn adapter_returning(reply: Result<Option<String>, AdvisoryError>) -> AdvisoryAdapter {
        let mut mock = MockChatService::new();
        let mut reply = Some(reply);
        mock.expect_chat()
            .times(1)
            .returning(move |_, _| reply.take().unwrap_or(Ok(None)));
        AdvisoryAdapter::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_disabled_adapter_is_empty() {
        assert!(AdvisoryAdapter::disabled().advisory_findings(&graph()).await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_absorbed() {
        let adapter = adapter_returning(Err(AdvisoryError::Network("refused".into())));
        assert!(adapter.advisory_findings(&graph()).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_array_and_bad_json_are_absorbed() {
        let adapter = adapter_returning(Ok(Some("No issues found.".into())));
        assert!(adapter.advisory_findings(&graph()).await.is_empty());

        let adapter = adapter_returning(Ok(Some("[{\"title\": }]".into())));
        assert!(adapter.advisory_findings(&graph()).await.is_empty());
    }

    #[tokio::test]
    async fn test_findings_are_parsed_and_filtered() {
        let reply = r#"Here you go:
[{"title": "Open database", "severity": "info", "affectedResources": ["db", "ghost"],
  "description": "x", "remediation": "y"}]"#;
        let adapter = adapter_returning(Ok(Some(reply.into())));
        let findings = adapter.advisory_findings(&graph()).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_resources, vec!["db"]);
        assert_eq!(findings[0].category, RuleCategory::Advisory);
        assert!(findings[0].id.starts_with("ai-"));
    }

    #[tokio::test]
    async fn test_prompt_carries_summary_and_token_bound() {
        let mut mock = MockChatService::new();
        mock.expect_chat()
            .withf(|messages, options| {
                options.max_tokens == 512
                    && messages.len() == 2
                    && messages[1].content.contains("\"aws-rds\"")
            })
            .times(1)
            .returning(|_, _| Ok(Some("[]".into())));
        let adapter = AdvisoryAdapter::new(Arc::new(mock)).with_max_tokens(512);
        assert!(adapter.advisory_findings(&graph()).await.is_empty());
    }

    #[tokio::test]
    async fn test_advisory_findings_follow_heuristics() {
        let adapter = adapter_returning(Ok(Some(
            r#"[{"title": "Consider caching", "severity": "low"}]"#.into(),
        )));
        let heuristics = evaluate_heuristics(&graph());
        let merged = analyze_with_advisory(&graph(), &adapter).await;
        assert_eq!(merged.len(), heuristics.len() + 1);
        assert_eq!(&merged[..heuristics.len()], &heuristics[..]);
        assert_eq!(merged.last().unwrap().title, "Consider caching");
    }
}

//! Chat service backed by an Ollama-compatible `/api/chat` endpoint.

use super::{AdvisoryError, ChatMessage, ChatOptions, ChatService, MessageRole};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
    /// Transport timeout, separate from the adapter deadline
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

pub struct OllamaChatService {
    client: Client,
    config: OllamaConfig,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<OllamaChatMessage>,
    #[serde(default)]
    response: Option<String>,
}

impl OllamaChatService {
    pub fn new(config: OllamaConfig) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisoryError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn convert_message(message: &ChatMessage) -> OllamaChatMessage {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        OllamaChatMessage {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }

    async fn handle_response_error(response: Response) -> AdvisoryError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => AdvisoryError::ModelNotFound(text),
            500..=599 => AdvisoryError::ServiceUnavailable(format!("Server error: {}", text)),
            _ => AdvisoryError::Network(format!("HTTP {}: {}", status, text)),
        }
    }
}

#[async_trait]
impl ChatService for OllamaChatService {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        options: ChatOptions,
    ) -> Result<Option<String>, AdvisoryError> {
        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));
        let request = OllamaChatRequest {
            model: &self.config.model,
            messages: messages.iter().map(Self::convert_message).collect(),
            stream: false,
            options: OllamaOptions {
                num_predict: options.max_tokens,
                temperature: options.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisoryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::handle_response_error(response).await);
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Parse(e.to_string()))?;

        let content = body
            .message
            .map(|message| message.content)
            .or(body.response)
            .filter(|content| !content.trim().is_empty());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let msg = ChatMessage::system("be brief");
        let request = OllamaChatRequest {
            model: "llama3.1",
            messages: vec![OllamaChatService::convert_message(&msg)],
            stream: false,
            options: OllamaOptions {
                num_predict: 100,
                temperature: 0.0,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["options"]["num_predict"], 100);
        assert_eq!(json["stream"], false);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        let service = OllamaChatService::new(OllamaConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..OllamaConfig::default()
        })
        .unwrap();
        let err = service
            .chat(vec![ChatMessage::user("hi")], ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::Network(_)));
    }
}

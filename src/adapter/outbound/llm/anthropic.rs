//! Anthropic Claude LLM client.
//!
//! Implements the [`Llm`] port over the Anthropic Messages API. The system
//! instruction travels in the top-level `system` field.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::llm::Llm;

/// Anthropic Messages API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client.
#[derive(Debug)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    /// Model identifier (e.g., "claude-3-5-haiku-latest").
    model: String,
    max_tokens: usize,
    /// Sampling temperature (0.0 to 1.0).
    temperature: f64,
}

impl Anthropic {
    /// Create a new Anthropic client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a client from the `ANTHROPIC_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            Error::Config(ConfigError::MissingField {
                field: "ANTHROPIC_API_KEY",
            })
        })?;
        Ok(Self::new(api_key, model, 256, 0.0))
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f64,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Llm for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = Request {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        Ok(response
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Request/Response Serialization Tests ====================

    #[test]
    fn request_carries_system_instruction() {
        let request = Request {
            model: "claude-3-5-haiku-latest",
            max_tokens: 256,
            temperature: 0.0,
            system: "Answer with JSON.",
            messages: vec![Message {
                role: "user",
                content: "Is olive oil in the pantry?",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "claude-3-5-haiku-latest");
        assert_eq!(json["system"], "Answer with JSON.");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Is olive oil in the pantry?");
    }

    #[test]
    fn response_blocks_are_joined() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "{\"likely_present\": true, "},
                {"type": "text", "text": "\"confidence\": 0.8}"}
            ],
            "id": "msg_456",
            "model": "claude-3-5-haiku-latest",
            "role": "assistant",
            "stop_reason": "end_turn",
            "type": "message",
            "usage": {"input_tokens": 10, "output_tokens": 30}
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        let combined: String = response.content.into_iter().map(|c| c.text).collect();
        assert_eq!(combined, r#"{"likely_present": true, "confidence": 0.8}"#);
    }

    #[test]
    fn malformed_response_is_rejected() {
        let json = r#"{"content": "this should be an array"}"#;
        let result: std::result::Result<Response, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // ==================== Client Construction Tests ====================

    #[test]
    fn client_construction() {
        let client = Anthropic::new("test-api-key", "claude-3-5-haiku-latest", 256, 0.5);

        assert_eq!(client.api_key, "test-api-key");
        assert_eq!(client.model, "claude-3-5-haiku-latest");
        assert_eq!(client.max_tokens, 256);
        assert_eq!(client.name(), "anthropic");
    }

    #[test]
    fn from_env_missing_key() {
        std::env::remove_var("ANTHROPIC_API_KEY");

        let err = Anthropic::from_env("claude-3-5-haiku-latest").unwrap_err();
        assert!(
            err.to_string().contains("ANTHROPIC_API_KEY"),
            "Error should mention missing env var: {err}"
        );
    }
}

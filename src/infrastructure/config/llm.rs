//! LLM provider configuration.
//!
//! Selects the language model that answers availability questions for
//! definition stores.

use serde::Deserialize;

/// LLM provider configuration.
///
/// API keys are read from environment variables (`ANTHROPIC_API_KEY` or
/// `OPENAI_API_KEY`) at runtime, never from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    /// LLM provider to use for inference. Defaults to Anthropic.
    #[serde(default)]
    pub provider: LlmProvider,

    /// Used when `provider` is `anthropic`.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Used when `provider` is `openai`.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude models.
    #[default]
    Anthropic,
    /// OpenAI GPT models.
    OpenAi,
}

/// Anthropic-specific configuration. Requires `ANTHROPIC_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    /// Model identifier. Defaults to "claude-3-5-haiku-latest".
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Sampling temperature. Verdicts should be repeatable, so this
    /// defaults to 0.0.
    #[serde(default)]
    pub temperature: f64,

    /// Maximum tokens in the response. A verdict is a small JSON object.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_anthropic_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

/// OpenAI-specific configuration. Requires `OPENAI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Model identifier. Defaults to "gpt-4o-mini".
    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".into()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}

const fn default_max_tokens() -> usize {
    256
}

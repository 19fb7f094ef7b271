//! LLM completion port for inference adapters.
//!
//! Availability inference for definition-based stores is answered by a
//! language model through this interface.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap a specific provider and handle authentication and
/// response decoding. No retries happen here; a failed call is returned to
/// the inference adapter, which reports it upward.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request with a system instruction and a user prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is invalid.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

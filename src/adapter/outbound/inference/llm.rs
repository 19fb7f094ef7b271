//! LLM-backed availability inference.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::availability::InferredPresence;
use crate::error::{Error, Result};
use crate::port::outbound::inference::AvailabilityInference;
use crate::port::outbound::llm::Llm;

const SYSTEM_PROMPT: &str = "You judge whether a household store already holds an ingredient. \
Answer with a single JSON object and nothing else.";

/// Asks a language model whether an ingredient is likely in a described store.
pub struct LlmAvailabilityInference {
    llm: Arc<dyn Llm>,
}

impl LlmAvailabilityInference {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    fn build_prompt(ingredient: &str, store_description: &str) -> String {
        format!(
            r#"## Store
{store_description}

## Ingredient
{ingredient}

Is the ingredient likely already in this store?

## Output (JSON only)
```json
{{
  "likely_present": true,
  "confidence": 0.8
}}
```

Rules:
- "confidence" is how sure you are the ingredient is present, from 0.0 to 1.0
- "likely_present" is false when the description gives no reason to expect it
"#
        )
    }

    fn parse_response(response: &str) -> Result<InferredPresence> {
        let json = extract_json(response)?;
        let verdict: Verdict = serde_json::from_str(json)
            .map_err(|e| Error::Parse(format!("Invalid verdict JSON: {e}")))?;
        Ok(InferredPresence::try_new(
            verdict.confidence,
            verdict.likely_present,
        )?)
    }
}

#[async_trait]
impl AvailabilityInference for LlmAvailabilityInference {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn infer(&self, ingredient: &str, store_description: &str) -> Result<InferredPresence> {
        let prompt = Self::build_prompt(ingredient, store_description);
        let response = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!(provider = self.llm.name(), ingredient, "Availability inference complete");
        Self::parse_response(&response)
    }
}

#[derive(Deserialize)]
struct Verdict {
    likely_present: bool,
    confidence: f64,
}

/// Pull the JSON object out of a fenced block or surrounding prose.
fn extract_json(text: &str) -> Result<&str> {
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        let end = text[start..]
            .find("```")
            .map_or(text.len(), |i| start + i);
        Ok(text[start..end].trim())
    } else if let Some(start) = text.find('{') {
        let end = text.rfind('}').map_or(text.len(), |i| i + 1);
        Ok(&text[start..end])
    } else {
        Err(Error::Parse("No JSON found in response".into()))
    }
}

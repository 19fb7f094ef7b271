//! Table-driven availability inference.
//!
//! Answers from verdicts registered up front and fails for everything else,
//! so unlisted ingredients read as unknown. Used when LLM inference is
//! disabled and as a scripted collaborator in tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::availability::InferredPresence;
use crate::error::{PlannerError, Result};
use crate::port::outbound::inference::AvailabilityInference;

#[derive(Debug, Clone, Copy)]
struct Verdict {
    confidence: f64,
    likely_present: bool,
}

/// Fixed verdict table keyed by ingredient and, optionally, store description.
#[derive(Debug, Default)]
pub struct StaticInference {
    any_store: HashMap<String, Verdict>,
    per_store: HashMap<(String, String), Verdict>,
    delay: Option<Duration>,
}

impl StaticInference {
    /// An empty table; every call fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer for `ingredient` in any store.
    #[must_use]
    pub fn with_verdict(mut self, ingredient: &str, confidence: f64, likely_present: bool) -> Self {
        self.any_store.insert(
            ingredient.to_string(),
            Verdict {
                confidence,
                likely_present,
            },
        );
        self
    }

    /// Answer for `ingredient` in the store described by `store_description`.
    /// Takes precedence over [`with_verdict`](Self::with_verdict).
    #[must_use]
    pub fn with_store_verdict(
        mut self,
        store_description: &str,
        ingredient: &str,
        confidence: f64,
        likely_present: bool,
    ) -> Self {
        self.per_store.insert(
            (store_description.to_string(), ingredient.to_string()),
            Verdict {
                confidence,
                likely_present,
            },
        );
        self
    }

    /// Sleep before answering, to exercise timeouts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn lookup(&self, ingredient: &str, store_description: &str) -> Option<Verdict> {
        self.per_store
            .get(&(store_description.to_string(), ingredient.to_string()))
            .or_else(|| self.any_store.get(ingredient))
            .copied()
    }
}

#[async_trait]
impl AvailabilityInference for StaticInference {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn infer(&self, ingredient: &str, store_description: &str) -> Result<InferredPresence> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let verdict = self.lookup(ingredient, store_description).ok_or_else(|| {
            PlannerError::Inference(format!("no verdict for {ingredient} in \"{store_description}\""))
        })?;
        Ok(InferredPresence::try_new(
            verdict.confidence,
            verdict.likely_present,
        )?)
    }
}

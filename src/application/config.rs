//! Planner and inference configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for claim negotiation and shopping list scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Upper bound on each definition-store inference call, in milliseconds.
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,
    /// Ask inference which definition store covers an unmet remainder
    /// before falling back to the lowest-priority catch-all.
    #[serde(default = "default_consult_definition_stores")]
    pub consult_definition_stores: bool,
    /// Purchase likelihood for pantry entries whose presence is unknown (0.0 to 1.0).
    #[serde(default = "default_pantry_likelihood")]
    pub pantry_default_likelihood: f64,
    /// Purchase likelihood for grocery entries whose presence is unknown (0.0 to 1.0).
    #[serde(default = "default_grocery_likelihood")]
    pub grocery_default_likelihood: f64,
}

impl PlannerConfig {
    /// Inference timeout as a [`Duration`].
    #[must_use]
    pub const fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            inference_timeout_ms: default_inference_timeout_ms(),
            consult_definition_stores: default_consult_definition_stores(),
            pantry_default_likelihood: default_pantry_likelihood(),
            grocery_default_likelihood: default_grocery_likelihood(),
        }
    }
}

/// Configuration for the availability inference service.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Whether an LLM-backed inference service is wired in.
    ///
    /// When disabled every definition-store check is unknown and remainders
    /// always land on the catch-all store.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Minimum confidence for a "likely present" verdict to count (0.0 to 1.0).
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_confidence: default_min_confidence(),
        }
    }
}

const fn default_inference_timeout_ms() -> u64 {
    3000
}

const fn default_consult_definition_stores() -> bool {
    true
}

const fn default_pantry_likelihood() -> f64 {
    0.25
}

const fn default_grocery_likelihood() -> f64 {
    1.0
}

const fn default_enabled() -> bool {
    true
}

const fn default_min_confidence() -> f64 {
    0.5
}

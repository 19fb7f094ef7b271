//! Inference factory for definition-store availability checks.

use std::sync::Arc;

use crate::adapter::outbound::inference::{LlmAvailabilityInference, StaticInference};
use crate::port::outbound::inference::AvailabilityInference;
use crate::port::outbound::llm::Llm;

/// Build the availability inference service.
///
/// Without an LLM client every check is answered by an empty static table,
/// which reads as unknown.
pub fn build_inference(llm: Option<Arc<dyn Llm>>) -> Arc<dyn AvailabilityInference> {
    match llm {
        Some(llm) => Arc::new(LlmAvailabilityInference::new(llm)),
        None => Arc::new(StaticInference::new()),
    }
}

//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the allocation core reaches
//! out to: availability inference, LLM completion, name normalization, and
//! persistence.

pub mod inference;
pub mod journal;
pub mod llm;
pub mod normalizer;

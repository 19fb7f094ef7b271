//! Outbound adapters (driven side).

pub mod inference;
pub mod llm;
pub mod memory;
pub mod normalizer;
pub mod sqlite;

//! Availability inference adapters.
//!
//! Implement [`AvailabilityInference`](crate::port::outbound::inference::AvailabilityInference)
//! for definition-based stores.

pub mod fixed;
pub mod llm;

pub use fixed::StaticInference;
pub use llm::LlmAvailabilityInference;

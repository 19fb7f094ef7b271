//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │  registry · stores ·     │
//!                 │  ledger · resolver       │
//!                 └────────────┬─────────────┘
//!        ┌──────────────┬──────┴───────┬───────────────┐
//!        ▼              ▼              ▼               ▼
//! ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐
//! │ Inference  │ │    LLM     │ │ Normalizer │ │  Journal   │
//! │  Adapter   │ │  Adapter   │ │  Adapter   │ │  Adapter   │
//! └────────────┘ └────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! - [`AvailabilityInference`] - Presence verdicts for definition stores
//! - [`Llm`] - Text completion used by the LLM inference adapter
//! - [`NameNormalizer`] - Raw ingredient name to canonical name
//! - [`PlannerJournal`] - Logical persistence of planner state

pub mod outbound;

pub use outbound::inference::AvailabilityInference;
pub use outbound::journal::{PlannerJournal, PlannerSnapshot};
pub use outbound::llm::Llm;
pub use outbound::normalizer::NameNormalizer;

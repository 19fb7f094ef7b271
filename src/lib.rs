//! Larder - ingredient claims across household stores.
//!
//! A recipe generator proposes requirements; the planner allocates them
//! against the household's stores and keeps the books honest while several
//! planning sessions run at once.
//!
//! # Architecture
//!
//! - **Explicit stores** (fridge, freezer, shelf) track quantities. A claim
//!   against one is a virtual reservation: remaining = stocked - reserved.
//! - **Definition stores** (grocery, pantry) only carry a description. An
//!   availability inference service judges whether an ingredient is likely
//!   there; whatever explicit stores cannot cover lands on one of them as a
//!   provisional claim and shows up on the shopping list.
//! - Claims move `Reserved -> Consumed | Released` exactly once. Cooking a
//!   recipe consumes its claims and decrements stock; abandoning it releases
//!   them.
//!
//! # Modules
//!
//! - [`domain`] - Plain data and state machines
//! - [`port`] - Collaborator traits (inference, LLM, normalizer, journal)
//! - [`application`] - Registry, stores, ledger, resolver and the
//!   [`MealPlanner`](application::planner::MealPlanner) facade
//! - [`adapter`] - LLM clients, inference, journals and the CLI
//! - [`infrastructure`] - Config, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use larder::adapter::outbound::{
//!     inference::StaticInference, memory::MemoryJournal, normalizer::BasicNormalizer,
//! };
//! use larder::application::config::{InferenceConfig, PlannerConfig};
//! use larder::application::planner::{Collaborators, MealPlanner};
//!
//! let planner = MealPlanner::new(
//!     &PlannerConfig::default(),
//!     &InferenceConfig::default(),
//!     Collaborators {
//!         inference: Arc::new(StaticInference::new()),
//!         normalizer: Arc::new(BasicNormalizer),
//!         journal: Arc::new(MemoryJournal::new()),
//!     },
//! );
//! let fridge = planner.add_explicit_store("Fridge", 10)?;
//! # Ok::<(), larder::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

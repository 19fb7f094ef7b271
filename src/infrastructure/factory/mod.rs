//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`inference`] - Availability inference construction
//! - [`llm`] - LLM client construction
//! - [`persistence`] - Database and journal construction
//! - [`planner`] - Planner composition root

pub mod inference;
pub mod llm;
pub mod persistence;
pub mod planner;

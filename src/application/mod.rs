//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the planner's use cases. [`planner::MealPlanner`] is the
//! entry point; the other modules are its building blocks.

pub mod config;
pub mod ledger;
pub mod planner;
pub mod recipe;
pub mod registry;
pub mod resolver;
pub mod shopping;
pub mod store;
pub mod suggestion;

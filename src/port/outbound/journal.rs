//! Logical persistence port for planner state.
//!
//! The planner keeps its working state in memory and writes every change
//! through this port as an upsert. On startup the latest snapshot is loaded
//! and handed to [`MealPlanner::restore`](crate::application::planner::MealPlanner::restore).

use serde::{Deserialize, Serialize};

use crate::domain::{
    claim::Claim, ingredient::Ingredient, recipe::Recipe, store::StoreRecord,
};
use crate::error::Result;

/// Everything needed to rebuild a planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    pub ingredients: Vec<Ingredient>,
    /// Stores in creation order.
    pub stores: Vec<StoreRecord>,
    /// Recipes in selection order.
    pub recipes: Vec<Recipe>,
    /// Claims in creation order.
    pub claims: Vec<Claim>,
}

/// Durable record of planner state.
///
/// Writes are upserts keyed by the record id, so replaying the same record
/// twice is harmless.
pub trait PlannerJournal: Send + Sync {
    /// Record a newly created ingredient.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn record_ingredient(&self, ingredient: &Ingredient) -> Result<()>;

    /// Record a store, including its current inventory or description.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn record_store(&self, store: &StoreRecord) -> Result<()>;

    /// Record a recipe and its current status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn record_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Record claims in their current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn record_claims(&self, claims: &[Claim]) -> Result<()>;

    /// Load the full persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails or a row cannot be decoded.
    fn load(&self) -> Result<PlannerSnapshot>;
}

//! Selected recipes and their claim lifecycle status.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;

use crate::domain::{
    id::{RecipeId, SessionId},
    recipe::{Recipe, RecipeStatus},
};
use crate::error::PlannerError;

/// Recipes selected across all planning sessions.
///
/// Each recipe has a guard serializing claim creation against cooking and
/// abandoning. Lock order is recipe guard, then store locks, then ledger.
#[derive(Debug)]
pub struct RecipeBook {
    recipes: DashMap<RecipeId, Recipe>,
    guards: DashMap<RecipeId, Arc<Mutex<()>>>,
    next_sequence: AtomicU64,
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recipes: DashMap::new(),
            guards: DashMap::new(),
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Register a recipe chosen in `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank.
    pub fn select(&self, session: SessionId, name: impl Into<String>) -> Result<Recipe, PlannerError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let recipe = Recipe::select(session, name, sequence)?;
        info!(
            recipe_id = %recipe.id,
            session_id = %recipe.session_id,
            name = %recipe.name,
            "Recipe selected"
        );
        self.recipes.insert(recipe.id.clone(), recipe.clone());
        Ok(recipe)
    }

    /// Look up a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::RecipeNotFound`] if no recipe has this id.
    pub fn get(&self, id: &RecipeId) -> Result<Recipe, PlannerError> {
        self.recipes
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| PlannerError::RecipeNotFound { recipe: id.clone() })
    }

    /// Move the recipe to `ClaimsReserved`; a no-op if it already is.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::RecipeNotFound`] or, for finished recipes,
    /// [`PlannerError::InvalidRecipeTransition`].
    pub fn mark_reserved(&self, id: &RecipeId) -> Result<Recipe, PlannerError> {
        let mut entry = self
            .recipes
            .get_mut(id)
            .ok_or_else(|| PlannerError::RecipeNotFound { recipe: id.clone() })?;
        entry.mark_reserved()?;
        Ok(entry.value().clone())
    }

    /// Move the recipe to a terminal status. Returns the status it had before.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::RecipeNotFound`] or
    /// [`PlannerError::InvalidRecipeTransition`].
    pub fn finish(&self, id: &RecipeId, to: RecipeStatus) -> Result<RecipeStatus, PlannerError> {
        let mut entry = self
            .recipes
            .get_mut(id)
            .ok_or_else(|| PlannerError::RecipeNotFound { recipe: id.clone() })?;
        let previous = entry.status;
        entry.finish(to)?;
        info!(recipe_id = %id, name = %entry.name, status = %to, "Recipe finished");
        Ok(previous)
    }

    /// Put a recipe back to `status` after a failed finish.
    pub(crate) fn reopen(&self, id: &RecipeId, status: RecipeStatus) {
        if let Some(mut entry) = self.recipes.get_mut(id) {
            entry.status = status;
        }
    }

    /// Guard held while claims are attached to or settled for `id`.
    pub(crate) fn guard(&self, id: &RecipeId) -> Arc<Mutex<()>> {
        Arc::clone(self.guards.entry(id.clone()).or_default().value())
    }

    /// Recipes of `session` in selection order.
    #[must_use]
    pub fn in_session(&self, session: &SessionId) -> Vec<Recipe> {
        let mut recipes: Vec<_> = self
            .recipes
            .iter()
            .filter(|r| &r.session_id == session)
            .map(|r| r.value().clone())
            .collect();
        recipes.sort_by_key(|r| r.sequence);
        recipes
    }

    /// Every recipe in selection order.
    #[must_use]
    pub fn all(&self) -> Vec<Recipe> {
        let mut recipes: Vec<_> = self.recipes.iter().map(|r| r.value().clone()).collect();
        recipes.sort_by_key(|r| r.sequence);
        recipes
    }

    /// Replace the book contents with persisted recipes.
    pub fn restore(&self, recipes: Vec<Recipe>) {
        let next = recipes.iter().map(|r| r.sequence).max().unwrap_or(0) + 1;
        self.recipes.clear();
        for recipe in recipes {
            self.recipes.insert(recipe.id.clone(), recipe);
        }
        self.next_sequence.store(next, Ordering::SeqCst);
    }
}

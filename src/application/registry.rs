//! Ingredient registry.
//!
//! Keeps canonical ingredient identity. Raw names go through the
//! [`NameNormalizer`] port; the first mention of a canonical name creates
//! the ingredient and every later mention returns the same record.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::{
    id::IngredientId,
    ingredient::{Ingredient, IngredientRef},
    quantity::Unit,
};
use crate::error::PlannerError;
use crate::port::outbound::normalizer::NameNormalizer;

#[derive(Debug, Default)]
struct RegistryState {
    by_id: HashMap<IngredientId, Ingredient>,
    by_name: HashMap<String, IngredientId>,
}

/// Canonical ingredient registry.
pub struct IngredientRegistry {
    normalizer: Arc<dyn NameNormalizer>,
    state: RwLock<RegistryState>,
}

/// Outcome of resolving a reference, telling callers whether it was new.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub ingredient: Ingredient,
    /// True if this call created the ingredient.
    pub created: bool,
}

impl IngredientRegistry {
    /// Create an empty registry using `normalizer` for raw names.
    pub fn new(normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self {
            normalizer,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Normalize a raw name, creating the ingredient on first mention.
    ///
    /// `default_unit` is only used when the ingredient is created.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownIngredient`] if the name normalizes to nothing.
    pub fn normalize(&self, raw: &str, default_unit: &Unit) -> Result<Resolved, PlannerError> {
        let canonical = self.canonical(raw)?;

        if let Some(existing) = self.find_by_name(&canonical) {
            return Ok(Resolved {
                ingredient: existing,
                created: false,
            });
        }

        let mut state = self.state.write();
        // Another writer may have created it between the read and the write lock.
        if let Some(id) = state.by_name.get(&canonical) {
            if let Some(existing) = state.by_id.get(id) {
                return Ok(Resolved {
                    ingredient: existing.clone(),
                    created: false,
                });
            }
        }

        let ingredient = Ingredient::new(canonical.clone(), default_unit.clone());
        state.by_name.insert(canonical, ingredient.id.clone());
        state.by_id.insert(ingredient.id.clone(), ingredient.clone());
        info!(
            ingredient_id = %ingredient.id,
            name = %ingredient.canonical_name,
            "Ingredient registered"
        );
        Ok(Resolved {
            ingredient,
            created: true,
        })
    }

    /// Resolve a reference. Names are normalized (and created if absent);
    /// ids must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownIngredient`] for unknown ids and names
    /// that normalize to nothing.
    pub fn resolve(
        &self,
        reference: &IngredientRef,
        default_unit: &Unit,
    ) -> Result<Resolved, PlannerError> {
        match reference {
            IngredientRef::Id(id) => self
                .get(id)
                .map(|ingredient| Resolved {
                    ingredient,
                    created: false,
                })
                .ok_or_else(|| PlannerError::UnknownIngredient {
                    ingredient: id.to_string(),
                }),
            IngredientRef::Name(raw) => self.normalize(raw, default_unit),
        }
    }

    /// Find the ingredient a reference points at without registering it.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownIngredient`] for unknown ids and names
    /// that normalize to nothing. An unseen name is `Ok(None)`.
    pub fn lookup(&self, reference: &IngredientRef) -> Result<Option<Ingredient>, PlannerError> {
        match reference {
            IngredientRef::Id(id) => self
                .get(id)
                .map(Some)
                .ok_or_else(|| PlannerError::UnknownIngredient {
                    ingredient: id.to_string(),
                }),
            IngredientRef::Name(raw) => Ok(self.find_by_name(&self.canonical(raw)?)),
        }
    }

    /// Canonical form of a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownIngredient`] if the name normalizes to nothing.
    pub fn canonical(&self, raw: &str) -> Result<String, PlannerError> {
        self.normalizer
            .canonical_name(raw)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PlannerError::UnknownIngredient {
                ingredient: raw.to_string(),
            })
    }

    /// Look up an ingredient by id.
    #[must_use]
    pub fn get(&self, id: &IngredientId) -> Option<Ingredient> {
        self.state.read().by_id.get(id).cloned()
    }

    /// Canonical name for `id`, or the id itself if unknown.
    #[must_use]
    pub fn display_name(&self, id: &IngredientId) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |i| i.canonical_name)
    }

    /// All ingredients, sorted by canonical name.
    #[must_use]
    pub fn all(&self) -> Vec<Ingredient> {
        let mut all: Vec<_> = self.state.read().by_id.values().cloned().collect();
        all.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        all
    }

    /// Replace the registry contents with persisted ingredients.
    pub fn restore(&self, ingredients: Vec<Ingredient>) {
        let mut state = self.state.write();
        state.by_id.clear();
        state.by_name.clear();
        for ingredient in ingredients {
            state
                .by_name
                .insert(ingredient.canonical_name.clone(), ingredient.id.clone());
            state.by_id.insert(ingredient.id.clone(), ingredient);
        }
    }

    fn find_by_name(&self, canonical: &str) -> Option<Ingredient> {
        let state = self.state.read();
        state
            .by_name
            .get(canonical)
            .and_then(|id| state.by_id.get(id))
            .cloned()
    }
}

//! Meal planner facade.
//!
//! Wires the registry, stores, ledger, recipe book and resolver together and
//! exposes the operations the recipe generator calls. Every state change is
//! written through the [`PlannerJournal`] port after it is applied in memory.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::config::{InferenceConfig, PlannerConfig};
use crate::application::ledger::ClaimLedger;
use crate::application::recipe::RecipeBook;
use crate::application::registry::IngredientRegistry;
use crate::application::resolver::{Resolver, ResolverSettings};
use crate::application::shopping::{build_shopping_list, LikelihoodDefaults};
use crate::application::store::{InventorySource, StoreCatalog};
use crate::application::suggestion;
use crate::domain::{
    availability::Availability,
    claim::{Claim, ClaimState},
    id::{ClaimId, IngredientId, RecipeId, SessionId, StoreId},
    ingredient::{Ingredient, IngredientRef, Requirement},
    outcome::ClaimResult,
    quantity::{Quantity, Unit},
    recipe::{Recipe, RecipeStatus},
    shopping::ShoppingList,
    store::{DefinitionKind, StoreRecord},
    suggestion::{InventoryLine, InventorySnapshot, SuggestionBasis, SuggestionValidity},
};
use crate::error::Result;
use crate::port::outbound::{
    inference::AvailabilityInference,
    journal::{PlannerJournal, PlannerSnapshot},
    normalizer::NameNormalizer,
};

/// External collaborators the planner reaches through ports.
pub struct Collaborators {
    pub inference: Arc<dyn AvailabilityInference>,
    pub normalizer: Arc<dyn NameNormalizer>,
    pub journal: Arc<dyn PlannerJournal>,
}

/// Ingredient-claim negotiation across stores for one household.
pub struct MealPlanner {
    registry: IngredientRegistry,
    catalog: StoreCatalog,
    ledger: ClaimLedger,
    recipes: RecipeBook,
    journal: Arc<dyn PlannerJournal>,
    settings: ResolverSettings,
    likelihoods: LikelihoodDefaults,
}

impl MealPlanner {
    /// Create an empty planner.
    pub fn new(
        planner: &PlannerConfig,
        inference: &InferenceConfig,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry: IngredientRegistry::new(collaborators.normalizer),
            catalog: StoreCatalog::new(collaborators.inference, planner.inference_timeout()),
            ledger: ClaimLedger::new(),
            recipes: RecipeBook::new(),
            journal: collaborators.journal,
            settings: ResolverSettings {
                consult_definition_stores: planner.consult_definition_stores && inference.enabled,
                min_confidence: inference.min_confidence,
            },
            likelihoods: LikelihoodDefaults {
                grocery: planner.grocery_default_likelihood,
                pantry: planner.pantry_default_likelihood,
            },
        }
    }

    /// Replace in-memory state with a persisted snapshot.
    pub fn restore(&self, snapshot: PlannerSnapshot) {
        info!(
            ingredients = snapshot.ingredients.len(),
            stores = snapshot.stores.len(),
            recipes = snapshot.recipes.len(),
            claims = snapshot.claims.len(),
            "Restoring planner state"
        );
        self.registry.restore(snapshot.ingredients);
        self.catalog.restore(snapshot.stores);
        self.recipes.restore(snapshot.recipes);
        self.ledger.restore(snapshot.claims);
    }

    /// Load the journal's latest snapshot into this planner.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be read.
    pub fn reload(&self) -> Result<()> {
        let snapshot = self.journal.load()?;
        self.restore(snapshot);
        Ok(())
    }

    // Stores

    /// Create a quantity-tracked store.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the journal write fails.
    pub fn add_explicit_store(&self, name: &str, priority: i32) -> Result<StoreRecord> {
        let store = self.catalog.add_explicit(name, priority)?;
        let record = store.record();
        self.journal.record_store(&record)?;
        Ok(record)
    }

    /// Create a description-based store.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the journal write fails.
    pub fn add_definition_store(
        &self,
        name: &str,
        priority: i32,
        kind: DefinitionKind,
        description: &str,
    ) -> Result<StoreRecord> {
        let store = self.catalog.add_definition(name, priority, kind, description)?;
        let record = store.record();
        self.journal.record_store(&record)?;
        Ok(record)
    }

    /// Replace a definition store's description.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unknown or explicit.
    pub fn set_store_description(&self, store: &StoreId, description: &str) -> Result<StoreRecord> {
        let store = self.catalog.definition(store)?;
        store.set_description(description);
        self.ledger.touch();
        let record = store.record();
        self.journal.record_store(&record)?;
        Ok(record)
    }

    /// Every store in visiting order.
    #[must_use]
    pub fn stores(&self) -> Vec<StoreRecord> {
        self.catalog.ordered().iter().map(|s| s.record()).collect()
    }

    /// Look up one store.
    ///
    /// # Errors
    ///
    /// Returns an error if no store has this id.
    pub fn store(&self, id: &StoreId) -> Result<StoreRecord> {
        Ok(self.catalog.get(id)?.record())
    }

    /// Find a store by id or, failing that, by case-insensitive name.
    #[must_use]
    pub fn find_store(&self, key: &str) -> Option<StoreRecord> {
        let stores = self.stores();
        stores
            .iter()
            .find(|s| s.id.as_str() == key)
            .or_else(|| stores.iter().find(|s| s.name.eq_ignore_ascii_case(key)))
            .cloned()
    }

    // Inventory

    /// Add physical stock to an explicit store. Every call adds.
    ///
    /// Returns the new stocked quantity for the `(ingredient, unit)` line.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown stores, definition stores, unresolvable
    /// ingredients, non-positive quantities, or journal failures.
    pub fn add_explicit_inventory(
        &self,
        store: &StoreId,
        ingredient: &IngredientRef,
        quantity: Quantity,
        unit: &Unit,
        note: Option<String>,
    ) -> Result<Quantity> {
        let store = self.catalog.explicit(store)?;
        let ingredient = self.resolve_ingredient(ingredient, unit)?;
        let total = store.add_stock(&ingredient, quantity, unit.clone(), note)?;
        self.ledger.touch();
        self.journal.record_store(&store.record())?;
        Ok(total)
    }

    /// Remove unreserved physical stock from an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal would cut into reserved quantity, as
    /// well as for the failures of [`add_explicit_inventory`](Self::add_explicit_inventory).
    pub fn remove_explicit_inventory(
        &self,
        store: &StoreId,
        ingredient: &IngredientRef,
        quantity: Quantity,
        unit: &Unit,
    ) -> Result<Quantity> {
        let store = self.catalog.explicit(store)?;
        let ingredient = self.resolve_ingredient(ingredient, unit)?;
        let left = store.remove_stock(&ingredient, quantity, unit, &self.ledger)?;
        self.ledger.touch();
        self.journal.record_store(&store.record())?;
        Ok(left)
    }

    /// Ask one store whether it can cover `quantity`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown stores or unresolvable ingredients.
    pub async fn check_availability(
        &self,
        store: &StoreId,
        ingredient: &IngredientRef,
        quantity: Quantity,
        unit: &Unit,
    ) -> Result<Availability> {
        let store = self.catalog.get(store)?;
        let ingredient = self.resolve_ingredient(ingredient, unit)?;
        Ok(store
            .source()
            .check_availability(&ingredient, quantity, unit, &self.ledger)
            .await)
    }

    /// Explicit lines whose reservations exceed stock. Always empty unless
    /// the reservation invariant was broken.
    #[must_use]
    pub fn overcommitted_lines(&self) -> Vec<InventoryLine> {
        let mut lines = Vec::new();
        let reserved = self.ledger.reserved_by_store();
        for store in self.catalog.explicit_stores() {
            let inventory = store.lock();
            for ((store_id, ingredient, unit), held) in &reserved {
                if store_id != store.id() {
                    continue;
                }
                let remaining = inventory.stocked(ingredient, unit) - *held;
                if remaining < Decimal::ZERO {
                    lines.push(InventoryLine {
                        store_id: store_id.clone(),
                        store_name: store.name().to_string(),
                        ingredient_name: self.registry.display_name(ingredient),
                        ingredient_id: ingredient.clone(),
                        unit: unit.clone(),
                        remaining,
                    });
                }
            }
        }
        lines
    }

    // Recipes

    /// Register a recipe chosen in `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the journal write fails.
    pub fn select_recipe(&self, session: &SessionId, name: &str) -> Result<Recipe> {
        let recipe = self.recipes.select(session.clone(), name)?;
        self.journal.record_recipe(&recipe)?;
        Ok(recipe)
    }

    /// Look up a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if no recipe has this id.
    pub fn recipe(&self, id: &RecipeId) -> Result<Recipe> {
        Ok(self.recipes.get(id)?)
    }

    /// Recipes of a session in selection order.
    #[must_use]
    pub fn recipes_in_session(&self, session: &SessionId) -> Vec<Recipe> {
        self.recipes.in_session(session)
    }

    /// Every claim a recipe ever made, in creation order.
    #[must_use]
    pub fn claims_for_recipe(&self, recipe: &RecipeId) -> Vec<Claim> {
        self.ledger.claims_for_recipe(recipe)
    }

    /// Look up a claim.
    ///
    /// # Errors
    ///
    /// Returns an error if no claim has this id.
    pub fn claim(&self, id: &ClaimId) -> Result<Claim> {
        Ok(self.ledger.get(id)?)
    }

    /// Every known ingredient, sorted by name.
    #[must_use]
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.registry.all()
    }

    /// Canonical name of an ingredient, or its id if unknown.
    #[must_use]
    pub fn ingredient_name(&self, id: &IngredientId) -> String {
        self.registry.display_name(id)
    }

    // Claims

    /// Allocate one requirement for a recipe across the stores.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown recipes, reservation conflicts and
    /// journal failures. Invalid input is a [`ClaimResult::Rejected`].
    pub async fn propose_claim(
        &self,
        ingredient: &IngredientRef,
        quantity: Quantity,
        unit: &Unit,
        recipe: &RecipeId,
    ) -> Result<ClaimResult> {
        let result = self
            .resolver()
            .propose_claim(ingredient, quantity, unit, recipe)
            .await?;
        if !result.is_rejected() {
            self.persist_recipe(recipe)?;
        }
        Ok(result)
    }

    /// Allocate a recipe's requirements in order. Earlier claims are kept
    /// if a later requirement fails.
    ///
    /// # Errors
    ///
    /// Returns the first error; claims made before it stay reserved and
    /// are persisted.
    pub async fn propose_batch(
        &self,
        recipe: &RecipeId,
        requirements: &[Requirement],
    ) -> Result<Vec<ClaimResult>> {
        let outcome = self.resolver().propose_batch(recipe, requirements).await;
        if self.recipes.get(recipe).is_ok() {
            self.persist_recipe(recipe)?;
        }
        Ok(outcome?)
    }

    /// Release a single claim.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim is unknown or already settled.
    pub fn release_claim(&self, id: &ClaimId) -> Result<Claim> {
        let claim = self.ledger.release(id, &self.catalog)?;
        self.journal.record_claims(std::slice::from_ref(&claim))?;
        Ok(claim)
    }

    /// Consume a single claim, decrementing explicit stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim is unknown or already settled.
    pub fn consume_claim(&self, id: &ClaimId) -> Result<Claim> {
        let claim = self.ledger.consume(id, &self.catalog)?;
        self.journal.record_claims(std::slice::from_ref(&claim))?;
        self.persist_stores(std::slice::from_ref(&claim))?;
        Ok(claim)
    }

    /// Abandon a recipe: release all its Reserved claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is unknown or already finished.
    pub fn release_claims_for_recipe(&self, recipe: &RecipeId) -> Result<Vec<Claim>> {
        self.finish_recipe(recipe, RecipeStatus::Abandoned, ClaimState::Released)
    }

    /// Cook a recipe: consume all its Reserved claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is unknown or already finished.
    pub fn consume_claims_for_recipe(&self, recipe: &RecipeId) -> Result<Vec<Claim>> {
        self.finish_recipe(recipe, RecipeStatus::Cooked, ClaimState::Consumed)
    }

    fn finish_recipe(
        &self,
        recipe: &RecipeId,
        status: RecipeStatus,
        claims_to: ClaimState,
    ) -> Result<Vec<Claim>> {
        let settled = {
            // Proposals create claims under the same guard, so none can be
            // attached between the status change and the settle.
            let guard = self.recipes.guard(recipe);
            let _finishing = guard.lock();

            let previous = self.recipes.finish(recipe, status)?;
            let ids: Vec<_> = self
                .ledger
                .claims_for_recipe(recipe)
                .into_iter()
                .filter(Claim::is_reserved)
                .map(|c| c.id().clone())
                .collect();

            match self.ledger.settle(&ids, claims_to, &self.catalog) {
                Ok(settled) => settled,
                Err(e) => {
                    warn!(recipe_id = %recipe, error = %e, "Settling recipe claims failed");
                    self.recipes.reopen(recipe, previous);
                    return Err(e.into());
                }
            }
        };

        self.journal.record_claims(&settled)?;
        self.journal.record_recipe(&self.recipes.get(recipe)?)?;
        if claims_to == ClaimState::Consumed {
            self.persist_stores(&settled)?;
        }
        Ok(settled)
    }

    // Views

    /// Aggregated purchase view for a session's unfinished recipes.
    #[must_use]
    pub fn shopping_list(&self, session: &SessionId) -> ShoppingList {
        build_shopping_list(
            session,
            &self.recipes,
            &self.ledger,
            &self.catalog,
            &self.registry,
            self.likelihoods,
        )
    }

    /// Remaining explicit stock at the current ledger version.
    #[must_use]
    pub fn snapshot(&self) -> InventorySnapshot {
        suggestion::snapshot(&self.catalog, &self.ledger, &self.registry)
    }

    /// Record what a suggestion assumes about explicit coverage. Read-only:
    /// unseen ingredient names are not registered.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ingredient ids and blank names.
    pub fn pitch_basis(&self, requirements: &[Requirement]) -> Result<SuggestionBasis> {
        Ok(suggestion::pitch_basis(
            requirements,
            &self.catalog,
            &self.ledger,
            &self.registry,
        )?)
    }

    /// Check a pitched suggestion against current state.
    #[must_use]
    pub fn revalidate(&self, basis: &SuggestionBasis) -> SuggestionValidity {
        suggestion::revalidate(basis, &self.catalog, &self.ledger)
    }

    /// Ledger version; changes whenever claims or stock change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.ledger.version()
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            &self.registry,
            &self.catalog,
            &self.ledger,
            &self.recipes,
            self.settings,
        )
    }

    fn resolve_ingredient(&self, reference: &IngredientRef, unit: &Unit) -> Result<Ingredient> {
        let resolved = self.registry.resolve(reference, unit)?;
        if resolved.created {
            self.journal.record_ingredient(&resolved.ingredient)?;
        }
        Ok(resolved.ingredient)
    }

    fn persist_recipe(&self, recipe: &RecipeId) -> Result<()> {
        let claims = self.ledger.claims_for_recipe(recipe);
        self.persist_ingredients(claims.iter().map(Claim::ingredient_id))?;
        self.journal.record_claims(&claims)?;
        self.journal.record_recipe(&self.recipes.get(recipe)?)?;
        Ok(())
    }

    fn persist_ingredients<'a>(&self, ids: impl Iterator<Item = &'a IngredientId>) -> Result<()> {
        let ids: BTreeSet<_> = ids.collect();
        for id in ids {
            if let Some(ingredient) = self.registry.get(id) {
                self.journal.record_ingredient(&ingredient)?;
            }
        }
        Ok(())
    }

    fn persist_stores(&self, claims: &[Claim]) -> Result<()> {
        let ids: BTreeSet<_> = claims
            .iter()
            .filter(|c| c.holds_stock())
            .filter_map(Claim::store_id)
            .collect();
        for id in ids {
            self.journal.record_store(&self.catalog.get(id)?.record())?;
        }
        Ok(())
    }
}

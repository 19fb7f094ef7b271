//! Availability resolver.
//!
//! Allocates one ingredient requirement across the stores:
//!
//! 1. Validate: non-positive quantities, unresolvable ingredients and
//!    finished recipes are rejected without touching anything.
//! 2. Visit explicit stores by priority (descending, then creation order)
//!    and greedily reserve what each can cover.
//! 3. Whatever is left becomes a provisional claim attributed to a
//!    definition store: the first one inference believes already has the
//!    ingredient, otherwise the lowest-priority catch-all.
//!
//! Inference runs before any claim exists. Claims are then created under the
//! recipe guard that cooking and abandoning also hold, so a finished recipe
//! never keeps a Reserved claim.
//!
//! Given the same stores and stock, the same requirement always splits the
//! same way.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::application::ledger::ClaimLedger;
use crate::application::recipe::RecipeBook;
use crate::application::registry::IngredientRegistry;
use crate::application::store::{InventorySource, ReservationRequest, StoreCatalog};
use crate::domain::{
    availability::InferredPresence,
    claim::{Claim, ClaimSource, ClaimState},
    id::{RecipeId, StoreId},
    ingredient::{Ingredient, IngredientRef, Requirement},
    outcome::{ClaimResult, RejectReason},
    quantity::{Quantity, Unit},
};
use crate::error::PlannerError;

/// How remainders are attributed to definition stores.
#[derive(Debug, Clone, Copy)]
pub struct ResolverSettings {
    /// Ask inference which definition store already has the ingredient.
    pub consult_definition_stores: bool,
    /// Positive verdicts below this confidence are treated as unlikely.
    pub min_confidence: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            consult_definition_stores: true,
            min_confidence: 0.5,
        }
    }
}

/// Definition store picked for a remainder and the presence verdict behind it.
type Attribution = (Option<StoreId>, Option<InferredPresence>);

/// Borrowed view over the planner state needed to allocate requirements.
pub struct Resolver<'a> {
    registry: &'a IngredientRegistry,
    catalog: &'a StoreCatalog,
    ledger: &'a ClaimLedger,
    recipes: &'a RecipeBook,
    settings: ResolverSettings,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a IngredientRegistry,
        catalog: &'a StoreCatalog,
        ledger: &'a ClaimLedger,
        recipes: &'a RecipeBook,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            registry,
            catalog,
            ledger,
            recipes,
            settings,
        }
    }

    /// Allocate one requirement for `recipe`.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::RecipeNotFound`] for unknown recipes and
    /// propagates reservation conflicts. Claims made for this requirement
    /// before a conflict are released again.
    pub async fn propose_claim(
        &self,
        ingredient: &IngredientRef,
        quantity: Quantity,
        unit: &Unit,
        recipe_id: &RecipeId,
    ) -> Result<ClaimResult, PlannerError> {
        let recipe = self.recipes.get(recipe_id)?;
        if recipe.is_terminal() {
            return Ok(self.reject(RejectReason::RecipeFinalized {
                recipe: recipe_id.clone(),
            }));
        }
        if quantity <= Decimal::ZERO {
            return Ok(self.reject(RejectReason::InvalidQuantity { quantity }));
        }
        let ingredient = match self.registry.resolve(ingredient, unit) {
            Ok(resolved) => resolved.ingredient,
            Err(PlannerError::UnknownIngredient { .. }) => {
                return Ok(self.reject(RejectReason::UnknownIngredient {
                    ingredient: ingredient.to_string(),
                }));
            }
            Err(e) => return Err(e),
        };

        // Inference may take a while, so attribution happens before the
        // recipe guard is taken. Stock can still move in between; a remainder
        // nobody attributed goes to the catch-all.
        let attribution = if self.explicit_coverable(&ingredient, unit) < quantity {
            Some(self.attribute_remainder(&ingredient).await)
        } else {
            None
        };

        self.allocate(&ingredient, quantity, unit, recipe_id, attribution)
    }

    /// Reserve and attribute under the recipe guard, so a concurrent cook or
    /// abandon either settles every claim made here or sees none of them.
    fn allocate(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: &Unit,
        recipe_id: &RecipeId,
        attribution: Option<Attribution>,
    ) -> Result<ClaimResult, PlannerError> {
        let guard = self.recipes.guard(recipe_id);
        let _finishing = guard.lock();

        if self.recipes.get(recipe_id)?.is_terminal() {
            return Ok(self.reject(RejectReason::RecipeFinalized {
                recipe: recipe_id.clone(),
            }));
        }

        let mut claims = Vec::new();
        let remaining = match self.reserve_explicit(ingredient, quantity, unit, recipe_id, &mut claims) {
            Ok(remaining) => remaining,
            Err(e) => {
                self.undo(&claims)?;
                return Err(e);
            }
        };

        let shortfall = if remaining > Decimal::ZERO {
            let (store_id, presence) = attribution.unwrap_or_else(|| self.catch_all());
            let claim = match self.ledger.create_claim(
                ingredient.id.clone(),
                remaining,
                unit.clone(),
                recipe_id.clone(),
                store_id,
                ClaimSource::Provisional {
                    presence_confidence: presence.map(|p| p.confidence()),
                },
            ) {
                Ok(claim) => claim,
                Err(e) => {
                    self.undo(&claims)?;
                    return Err(e);
                }
            };
            Some(claim)
        } else {
            None
        };

        if let Err(e) = self.recipes.mark_reserved(recipe_id) {
            let mut made = claims.clone();
            made.extend(shortfall.iter().cloned());
            self.undo(&made)?;
            return Err(e);
        }

        debug!(
            recipe_id = %recipe_id,
            ingredient = %ingredient.canonical_name,
            requested = %quantity,
            reserved = %(quantity - remaining),
            missing = %remaining,
            "Requirement allocated"
        );

        Ok(match shortfall {
            None => ClaimResult::Accepted { claims },
            Some(shortfall) => ClaimResult::Partial {
                claims,
                missing: remaining,
                shortfall,
            },
        })
    }

    /// Allocate a recipe's requirements strictly in the given order.
    ///
    /// Earlier claims are kept when a later requirement is rejected or
    /// fails; release the recipe to discard them.
    ///
    /// # Errors
    ///
    /// Stops at the first error from [`propose_claim`](Self::propose_claim).
    pub async fn propose_batch(
        &self,
        recipe_id: &RecipeId,
        requirements: &[Requirement],
    ) -> Result<Vec<ClaimResult>, PlannerError> {
        let mut results = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let result = self
                .propose_claim(
                    &requirement.ingredient,
                    requirement.quantity,
                    &requirement.unit,
                    recipe_id,
                )
                .await?;
            results.push(result);
        }
        Ok(results)
    }

    fn reserve_explicit(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: &Unit,
        recipe_id: &RecipeId,
        claims: &mut Vec<Claim>,
    ) -> Result<Quantity, PlannerError> {
        let mut remaining = quantity;
        for store in self.catalog.explicit_stores() {
            if remaining <= Decimal::ZERO {
                break;
            }
            let request = ReservationRequest {
                ingredient,
                quantity: remaining,
                unit,
                recipe: recipe_id,
            };
            if let Some(claim) = store.attempt_reserve(request, self.ledger)? {
                debug!(
                    store = %store.name(),
                    ingredient = %ingredient.canonical_name,
                    reserved = %claim.quantity(),
                    "Reserved from explicit store"
                );
                remaining -= claim.quantity();
                claims.push(claim);
            }
        }
        Ok(remaining)
    }

    /// What the explicit stores could still reserve of `ingredient`.
    fn explicit_coverable(&self, ingredient: &Ingredient, unit: &Unit) -> Quantity {
        self.catalog
            .explicit_stores()
            .iter()
            .map(|store| store.remaining(&ingredient.id, unit, self.ledger).max(Decimal::ZERO))
            .sum()
    }

    fn catch_all(&self) -> Attribution {
        (self.catalog.catch_all().map(|store| store.id().clone()), None)
    }

    /// Pick the definition store that receives an unmet remainder.
    async fn attribute_remainder(&self, ingredient: &Ingredient) -> Attribution {
        let stores = self.catalog.definition_stores();
        let Some(catch_all) = stores.last().cloned() else {
            return (None, None);
        };
        if !self.settings.consult_definition_stores {
            return (Some(catch_all.id().clone()), None);
        }

        let mut catch_all_presence = None;
        for store in &stores {
            let presence = store.assess(ingredient).await;
            if let Some(p) = presence {
                if p.is_confidently_present(self.settings.min_confidence) {
                    return (Some(store.id().clone()), Some(p));
                }
            }
            if store.id() == catch_all.id() {
                catch_all_presence = presence;
            }
        }
        (Some(catch_all.id().clone()), catch_all_presence)
    }

    /// Release the claims of an aborted proposal that are still Reserved.
    fn undo(&self, claims: &[Claim]) -> Result<(), PlannerError> {
        let ids: Vec<_> = claims
            .iter()
            .filter(|c| self.ledger.get(c.id()).is_ok_and(|current| current.is_reserved()))
            .map(|c| c.id().clone())
            .collect();
        if let Err(e) = self.ledger.settle(&ids, ClaimState::Released, self.catalog) {
            warn!(error = %e, claims = ids.len(), "Failed to release claims of an aborted proposal");
            return Err(e);
        }
        Ok(())
    }

    fn reject(&self, reason: RejectReason) -> ClaimResult {
        warn!(reason = %reason, "Claim proposal rejected");
        ClaimResult::Rejected(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::inference::fixed::StaticInference;
    use crate::adapter::outbound::normalizer::BasicNormalizer;
    use crate::domain::id::SessionId;
    use crate::domain::store::DefinitionKind;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    struct World {
        registry: IngredientRegistry,
        catalog: StoreCatalog,
        ledger: ClaimLedger,
        recipes: RecipeBook,
    }

    impl World {
        fn new(inference: StaticInference) -> Self {
            Self {
                registry: IngredientRegistry::new(Arc::new(BasicNormalizer)),
                catalog: StoreCatalog::new(Arc::new(inference), Duration::from_secs(1)),
                ledger: ClaimLedger::new(),
                recipes: RecipeBook::new(),
            }
        }

        fn resolver(&self) -> Resolver<'_> {
            Resolver::new(
                &self.registry,
                &self.catalog,
                &self.ledger,
                &self.recipes,
                ResolverSettings::default(),
            )
        }

        fn stock(&self, store: &str, priority: i32, name: &str, quantity: Quantity, unit: &str) {
            let store = self.catalog.add_explicit(store, priority).unwrap();
            let ingredient = self.registry.normalize(name, &Unit::new(unit)).unwrap();
            store
                .add_stock(&ingredient.ingredient, quantity, Unit::new(unit), None)
                .unwrap();
        }

        fn recipe(&self) -> RecipeId {
            self.recipes.select(SessionId::new("s"), "Chili").unwrap().id
        }
    }

    #[tokio::test]
    async fn splits_across_explicit_stores_by_priority() {
        let world = World::new(StaticInference::new());
        world.stock("Fridge", 5, "carrots", dec!(1), "lb");
        world.stock("Cellar", 8, "carrots", dec!(1), "lb");
        let recipe = world.recipe();

        let result = world
            .resolver()
            .propose_claim(&"carrots".into(), dec!(1.5), &Unit::new("lb"), &recipe)
            .await
            .unwrap();

        assert!(result.is_accepted());
        let quantities: Vec<_> = result.claims().iter().map(Claim::quantity).collect();
        assert_eq!(quantities, vec![dec!(1), dec!(0.5)]);
        assert_eq!(
            world.recipes.get(&recipe).unwrap().status,
            crate::domain::recipe::RecipeStatus::ClaimsReserved
        );
    }

    #[tokio::test]
    async fn remainder_goes_to_confident_definition_store() {
        let inference = StaticInference::new()
            .with_store_verdict("spice rack", "cumin", 0.9, true)
            .with_store_verdict("general store", "cumin", 0.2, false);
        let world = World::new(inference);
        let pantry = world
            .catalog
            .add_definition("Pantry", 3, DefinitionKind::Pantry, "spice rack")
            .unwrap();
        world
            .catalog
            .add_definition("Grocery", 1, DefinitionKind::Grocery, "general store")
            .unwrap();
        let recipe = world.recipe();

        let result = world
            .resolver()
            .propose_claim(&"cumin".into(), dec!(2), &Unit::new("tsp"), &recipe)
            .await
            .unwrap();

        let ClaimResult::Partial { shortfall, missing, claims } = result else {
            panic!("expected partial");
        };
        assert!(claims.is_empty());
        assert_eq!(missing, dec!(2));
        assert_eq!(shortfall.store_id(), Some(pantry.id()));
        assert_eq!(
            shortfall.source(),
            ClaimSource::Provisional {
                presence_confidence: Some(0.9)
            }
        );
    }

    #[tokio::test]
    async fn unknown_presence_falls_back_to_catch_all() {
        let world = World::new(StaticInference::new());
        world
            .catalog
            .add_definition("Pantry", 3, DefinitionKind::Pantry, "spice rack")
            .unwrap();
        let grocery = world
            .catalog
            .add_definition("Grocery", 1, DefinitionKind::Grocery, "general store")
            .unwrap();
        let recipe = world.recipe();

        let result = world
            .resolver()
            .propose_claim(&"saffron".into(), dec!(1), &Unit::new("g"), &recipe)
            .await
            .unwrap();

        let ClaimResult::Partial { shortfall, .. } = result else {
            panic!("expected partial");
        };
        assert_eq!(shortfall.store_id(), Some(grocery.id()));
        assert_eq!(
            shortfall.source(),
            ClaimSource::Provisional {
                presence_confidence: None
            }
        );
    }

    #[tokio::test]
    async fn remainder_without_definition_stores_has_no_store() {
        let world = World::new(StaticInference::new());
        let recipe = world.recipe();

        let result = world
            .resolver()
            .propose_claim(&"eggs".into(), dec!(6), &Unit::new("each"), &recipe)
            .await
            .unwrap();
        let ClaimResult::Partial { shortfall, .. } = result else {
            panic!("expected partial");
        };
        assert!(shortfall.store_id().is_none());
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_without_claims() {
        let world = World::new(StaticInference::new());
        let recipe = world.recipe();
        let resolver = world.resolver();

        let zero = resolver
            .propose_claim(&"eggs".into(), dec!(0), &Unit::new("each"), &recipe)
            .await
            .unwrap();
        assert!(matches!(
            zero,
            ClaimResult::Rejected(RejectReason::InvalidQuantity { .. })
        ));

        let blank = resolver
            .propose_claim(&"   ".into(), dec!(1), &Unit::new("each"), &recipe)
            .await
            .unwrap();
        assert!(matches!(
            blank,
            ClaimResult::Rejected(RejectReason::UnknownIngredient { .. })
        ));
        assert!(world.ledger.all().is_empty());
    }

    #[tokio::test]
    async fn unknown_recipe_is_an_error() {
        let world = World::new(StaticInference::new());
        let err = world
            .resolver()
            .propose_claim(&"eggs".into(), dec!(1), &Unit::new("each"), &RecipeId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::RecipeNotFound { .. }));
    }

    #[tokio::test]
    async fn recipe_cooked_during_inference_gets_no_claims() {
        let world = World::new(StaticInference::new().with_delay(Duration::from_millis(300)));
        world.stock("Shelf", 1, "rice", dec!(1), "cup");
        world
            .catalog
            .add_definition("Grocery", 0, DefinitionKind::Grocery, "general store")
            .unwrap();
        let recipe = world.recipe();

        let resolver = world.resolver();
        let ingredient: IngredientRef = "rice".into();
        let unit = Unit::new("cup");
        let propose = resolver.propose_claim(&ingredient, dec!(2), &unit, &recipe);
        let cook = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let guard = world.recipes.guard(&recipe);
            let _held = guard.lock();
            world
                .recipes
                .finish(&recipe, crate::domain::recipe::RecipeStatus::Cooked)
                .unwrap();
        };
        let (result, ()) = tokio::join!(propose, cook);

        assert!(matches!(
            result.unwrap(),
            ClaimResult::Rejected(RejectReason::RecipeFinalized { .. })
        ));
        assert!(world.ledger.claims_for_recipe(&recipe).is_empty());
    }

    #[test]
    fn undo_skips_claims_already_settled() {
        let world = World::new(StaticInference::new());
        world.stock("Shelf", 1, "rice", dec!(2), "cup");
        let recipe = world.recipe();
        let rice = world.registry.normalize("rice", &Unit::new("cup")).unwrap().ingredient;
        let shelf = world.catalog.explicit_stores().remove(0);
        let cup = Unit::new("cup");
        let request = |quantity| ReservationRequest {
            ingredient: &rice,
            quantity,
            unit: &cup,
            recipe: &recipe,
        };
        let consumed = shelf.attempt_reserve(request(dec!(1)), &world.ledger).unwrap().unwrap();
        let held = shelf.attempt_reserve(request(dec!(1)), &world.ledger).unwrap().unwrap();
        world.ledger.consume(consumed.id(), &world.catalog).unwrap();

        world.resolver().undo(&[consumed.clone(), held.clone()]).unwrap();

        assert_eq!(world.ledger.get(consumed.id()).unwrap().state(), ClaimState::Consumed);
        assert_eq!(world.ledger.get(held.id()).unwrap().state(), ClaimState::Released);
    }

    #[tokio::test]
    async fn batch_compounds_repeated_ingredients() {
        let world = World::new(StaticInference::new());
        world.stock("Fridge", 5, "butter", dec!(3), "tbsp");
        let recipe = world.recipe();

        let results = world
            .resolver()
            .propose_batch(
                &recipe,
                &[
                    Requirement::new("butter", dec!(2), "tbsp"),
                    Requirement::new("Butter", dec!(2), "tbsp"),
                ],
            )
            .await
            .unwrap();

        assert!(results[0].is_accepted());
        assert!(results[1].is_partial());
        assert_eq!(results[1].reserved_quantity(), dec!(1));
        assert_eq!(results[1].missing(), dec!(1));
    }
}

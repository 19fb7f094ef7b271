//! Claim ledger.
//!
//! The single source of truth for claims. Reserved stock-backed claims are
//! what makes explicit availability virtual: a store's remaining quantity is
//! its stocked quantity minus the Reserved claims held against it.
//!
//! Lock order is always store lock(s) first, then the ledger lock. Settling
//! claims across several stores takes the store locks in catalog order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;

use crate::application::store::{visiting_order, ExplicitStore, InventorySource, StoreCatalog};
use crate::domain::{
    claim::{Claim, ClaimSource, ClaimState},
    id::{ClaimId, IngredientId, RecipeId, StoreId},
    quantity::{Quantity, Unit},
    store::Inventory,
};
use crate::error::PlannerError;

#[derive(Debug, Default)]
struct LedgerState {
    /// Claims in creation order.
    claims: Vec<Claim>,
    index: HashMap<ClaimId, usize>,
}

impl LedgerState {
    fn get(&self, id: &ClaimId) -> Option<&Claim> {
        self.index.get(id).map(|&i| &self.claims[i])
    }

    fn push(&mut self, claim: Claim) {
        self.index.insert(claim.id().clone(), self.claims.len());
        self.claims.push(claim);
    }

    fn replace(&mut self, claim: Claim) {
        if let Some(&i) = self.index.get(claim.id()) {
            self.claims[i] = claim;
        }
    }
}

/// Tracks every claim and versions the reservation state.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    state: RwLock<LedgerState>,
    version: AtomicU64,
}

impl ClaimLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new Reserved claim.
    ///
    /// Stock-backed claims must only be created while the owning explicit
    /// store's lock is held; [`ExplicitStore`] does this on reserve.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidQuantity`] if `quantity` is not positive.
    pub fn create_claim(
        &self,
        ingredient_id: IngredientId,
        quantity: Quantity,
        unit: Unit,
        recipe_id: RecipeId,
        store_id: Option<StoreId>,
        source: ClaimSource,
    ) -> Result<Claim, PlannerError> {
        let claim = Claim::reserve(ingredient_id, quantity, unit, store_id, recipe_id, source)?;
        self.state.write().push(claim.clone());
        self.touch();
        info!(
            claim_id = %claim.id(),
            ingredient_id = %claim.ingredient_id(),
            quantity = %claim.quantity(),
            unit = %claim.unit(),
            store_id = ?claim.store_id().map(StoreId::as_str),
            recipe_id = %claim.recipe_id(),
            provisional = claim.source().is_provisional(),
            "Claim created"
        );
        Ok(claim)
    }

    /// Look up a claim.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ClaimNotFound`] if no claim has this id.
    pub fn get(&self, id: &ClaimId) -> Result<Claim, PlannerError> {
        self.state
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| PlannerError::ClaimNotFound { claim: id.clone() })
    }

    /// Reserved claims held against `store` for `ingredient`, any unit.
    #[must_use]
    pub fn active_claims_for(&self, store: &StoreId, ingredient: &IngredientId) -> Vec<Claim> {
        self.state
            .read()
            .claims
            .iter()
            .filter(|c| {
                c.is_reserved() && c.store_id() == Some(store) && c.ingredient_id() == ingredient
            })
            .cloned()
            .collect()
    }

    /// Quantity of `ingredient` in `unit` currently held against `store`.
    #[must_use]
    pub fn reserved_quantity(&self, store: &StoreId, ingredient: &IngredientId, unit: &Unit) -> Quantity {
        self.state
            .read()
            .claims
            .iter()
            .filter(|c| {
                c.is_reserved()
                    && c.holds_stock()
                    && c.store_id() == Some(store)
                    && c.ingredient_id() == ingredient
                    && c.unit() == unit
            })
            .map(Claim::quantity)
            .sum()
    }

    /// Every claim of `recipe` in creation order.
    #[must_use]
    pub fn claims_for_recipe(&self, recipe: &RecipeId) -> Vec<Claim> {
        self.state
            .read()
            .claims
            .iter()
            .filter(|c| c.recipe_id() == recipe)
            .cloned()
            .collect()
    }

    /// Every Reserved claim in creation order.
    #[must_use]
    pub fn reserved_claims(&self) -> Vec<Claim> {
        self.state
            .read()
            .claims
            .iter()
            .filter(|c| c.is_reserved())
            .cloned()
            .collect()
    }

    /// Every claim in creation order.
    #[must_use]
    pub fn all(&self) -> Vec<Claim> {
        self.state.read().claims.clone()
    }

    /// Move a claim Reserved -> Released.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ClaimNotFound`] or
    /// [`PlannerError::InvalidClaimTransition`].
    pub fn release(&self, id: &ClaimId, catalog: &StoreCatalog) -> Result<Claim, PlannerError> {
        self.settle_one(id, ClaimState::Released, catalog)
    }

    /// Move a claim Reserved -> Consumed and decrement the owning explicit
    /// store's physical stock.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ClaimNotFound`] or
    /// [`PlannerError::InvalidClaimTransition`].
    pub fn consume(&self, id: &ClaimId, catalog: &StoreCatalog) -> Result<Claim, PlannerError> {
        self.settle_one(id, ClaimState::Consumed, catalog)
    }

    fn settle_one(
        &self,
        id: &ClaimId,
        to: ClaimState,
        catalog: &StoreCatalog,
    ) -> Result<Claim, PlannerError> {
        let mut settled = self.settle(std::slice::from_ref(id), to, catalog)?;
        settled
            .pop()
            .ok_or_else(|| PlannerError::ClaimNotFound { claim: id.clone() })
    }

    /// Move every claim in `ids` to the terminal state `to`, all or nothing.
    ///
    /// Every explicit store the claims hold stock in is locked in catalog
    /// order, all transitions are validated, and only then applied. Consuming
    /// decrements physical stock in the same step.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; nothing is changed in that case.
    /// [`PlannerError::ConcurrentReservationConflict`] means a store holds
    /// less stock than its claims being consumed.
    pub fn settle(
        &self,
        ids: &[ClaimId],
        to: ClaimState,
        catalog: &StoreCatalog,
    ) -> Result<Vec<Claim>, PlannerError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let stores = self.stores_for(ids, catalog)?;
        let mut guards: Vec<_> = stores.iter().map(|s| (s.id().clone(), s.lock())).collect();

        let mut state = self.state.write();
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            let mut claim = state
                .get(id)
                .cloned()
                .ok_or_else(|| PlannerError::ClaimNotFound { claim: id.clone() })?;
            match to {
                ClaimState::Consumed => claim.consume()?,
                ClaimState::Released => claim.release()?,
                ClaimState::Reserved => claim.check_transition(to)?,
            }
            updated.push(claim);
        }

        // Work on copies so a failure leaves every store untouched.
        let mut inventories: Vec<(StoreId, Inventory)> = guards
            .iter()
            .map(|(id, guard)| (id.clone(), (**guard).clone()))
            .collect();
        if to == ClaimState::Consumed {
            for claim in updated.iter().filter(|c| c.holds_stock()) {
                let Some(store_id) = claim.store_id() else {
                    continue;
                };
                let Some((_, inventory)) = inventories.iter_mut().find(|(id, _)| id == store_id)
                else {
                    continue;
                };
                let stocked = inventory.stocked(claim.ingredient_id(), claim.unit());
                if stocked < claim.quantity() {
                    return Err(PlannerError::ConcurrentReservationConflict {
                        store: store_id.clone(),
                        reason: format!(
                            "claim {} needs {} {} but only {} is stocked",
                            claim.id(),
                            claim.quantity(),
                            claim.unit(),
                            stocked
                        ),
                    });
                }
                inventory.remove(claim.ingredient_id(), claim.quantity(), claim.unit())?;
            }
        }

        for ((_, guard), (_, inventory)) in guards.iter_mut().zip(inventories) {
            **guard = inventory;
        }
        for claim in &updated {
            state.replace(claim.clone());
            info!(
                claim_id = %claim.id(),
                recipe_id = %claim.recipe_id(),
                quantity = %claim.quantity(),
                unit = %claim.unit(),
                state = %to,
                "Claim settled"
            );
        }
        drop(state);
        drop(guards);
        self.touch();
        Ok(updated)
    }

    /// Explicit stores holding stock for `ids`, in catalog order.
    fn stores_for(
        &self,
        ids: &[ClaimId],
        catalog: &StoreCatalog,
    ) -> Result<Vec<Arc<ExplicitStore>>, PlannerError> {
        let mut store_ids: Vec<StoreId> = {
            let state = self.state.read();
            ids.iter()
                .filter_map(|id| state.get(id))
                .filter(|c| c.holds_stock())
                .filter_map(|c| c.store_id().cloned())
                .collect()
        };
        store_ids.sort();
        store_ids.dedup();

        let mut stores = store_ids
            .iter()
            .map(|id| catalog.explicit(id))
            .collect::<Result<Vec<_>, _>>()?;
        stores.sort_by_key(|s| visiting_order(s.as_ref()));
        Ok(stores)
    }

    /// Monotonic counter bumped on every change to claims or stock.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Bump the version after a change that bypasses the ledger, such as
    /// stock being added or removed.
    pub fn touch(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Replace the ledger contents with persisted claims.
    pub fn restore(&self, claims: Vec<Claim>) {
        let mut state = self.state.write();
        *state = LedgerState::default();
        for claim in claims {
            state.push(claim);
        }
        drop(state);
        self.touch();
    }

    /// Sum of Reserved stock-backed claims per store, used by invariant checks.
    #[must_use]
    pub fn reserved_by_store(&self) -> HashMap<(StoreId, IngredientId, Unit), Quantity> {
        let mut totals: HashMap<(StoreId, IngredientId, Unit), Quantity> = HashMap::new();
        for claim in self.state.read().claims.iter() {
            if !(claim.is_reserved() && claim.holds_stock()) {
                continue;
            }
            if let Some(store) = claim.store_id() {
                *totals
                    .entry((store.clone(), claim.ingredient_id().clone(), claim.unit().clone()))
                    .or_insert(Decimal::ZERO) += claim.quantity();
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::inference::fixed::StaticInference;
    use crate::domain::ingredient::Ingredient;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    struct Fixture {
        catalog: StoreCatalog,
        ledger: ClaimLedger,
        freezer: Arc<ExplicitStore>,
        beef: Ingredient,
        lb: Unit,
    }

    fn fixture() -> Fixture {
        let catalog = StoreCatalog::new(Arc::new(StaticInference::new()), Duration::from_secs(1));
        let freezer = catalog.add_explicit("Freezer", 10).unwrap();
        let lb = Unit::new("lb");
        let beef = Ingredient::new("ground beef", lb.clone());
        freezer.add_stock(&beef, dec!(2), lb.clone(), None).unwrap();
        Fixture {
            catalog,
            ledger: ClaimLedger::new(),
            freezer,
            beef,
            lb,
        }
    }

    fn reserve(f: &Fixture, quantity: Quantity) -> Claim {
        f.ledger
            .create_claim(
                f.beef.id.clone(),
                quantity,
                f.lb.clone(),
                RecipeId::from("recipe-1"),
                Some(f.freezer.id().clone()),
                ClaimSource::Stock,
            )
            .unwrap()
    }

    #[test]
    fn create_claim_rejects_non_positive_quantity() {
        let f = fixture();
        let result = f.ledger.create_claim(
            f.beef.id.clone(),
            dec!(0),
            f.lb.clone(),
            RecipeId::new(),
            None,
            ClaimSource::Provisional {
                presence_confidence: None,
            },
        );
        assert!(matches!(result, Err(PlannerError::InvalidQuantity { .. })));
        assert!(f.ledger.all().is_empty());
    }

    #[test]
    fn consume_decrements_stock_exactly_once() {
        let f = fixture();
        let claim = reserve(&f, dec!(1.5));

        f.ledger.consume(claim.id(), &f.catalog).unwrap();
        assert_eq!(f.freezer.stocked(&f.beef.id, &f.lb), dec!(0.5));

        let err = f.ledger.consume(claim.id(), &f.catalog).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidClaimTransition(_)));
        assert_eq!(f.freezer.stocked(&f.beef.id, &f.lb), dec!(0.5));
    }

    #[test]
    fn release_frees_without_touching_stock() {
        let f = fixture();
        let claim = reserve(&f, dec!(2));
        assert_eq!(f.freezer.remaining(&f.beef.id, &f.lb, &f.ledger), dec!(0));

        let released = f.ledger.release(claim.id(), &f.catalog).unwrap();
        assert_eq!(released.state(), ClaimState::Released);
        assert_eq!(f.freezer.stocked(&f.beef.id, &f.lb), dec!(2));
        assert_eq!(f.freezer.remaining(&f.beef.id, &f.lb, &f.ledger), dec!(2));
    }

    #[test]
    fn release_of_consumed_claim_fails() {
        let f = fixture();
        let claim = reserve(&f, dec!(1));
        f.ledger.consume(claim.id(), &f.catalog).unwrap();

        let err = f.ledger.release(claim.id(), &f.catalog).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidClaimTransition(_)));
    }

    #[test]
    fn unknown_claim_is_not_found() {
        let f = fixture();
        let err = f.ledger.release(&ClaimId::new(), &f.catalog).unwrap_err();
        assert!(matches!(err, PlannerError::ClaimNotFound { .. }));
    }

    #[test]
    fn settle_is_all_or_nothing() {
        let f = fixture();
        let first = reserve(&f, dec!(1));
        let second = reserve(&f, dec!(1));
        f.ledger.release(second.id(), &f.catalog).unwrap();

        let err = f
            .ledger
            .settle(
                &[first.id().clone(), second.id().clone()],
                ClaimState::Consumed,
                &f.catalog,
            )
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidClaimTransition(_)));
        assert!(f.ledger.get(first.id()).unwrap().is_reserved());
        assert_eq!(f.freezer.stocked(&f.beef.id, &f.lb), dec!(2));
    }

    #[test]
    fn active_claims_exclude_settled() {
        let f = fixture();
        let kept = reserve(&f, dec!(1));
        let dropped = reserve(&f, dec!(0.5));
        f.ledger.release(dropped.id(), &f.catalog).unwrap();

        let active = f.ledger.active_claims_for(f.freezer.id(), &f.beef.id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), kept.id());
        assert_eq!(
            f.ledger.reserved_quantity(f.freezer.id(), &f.beef.id, &f.lb),
            dec!(1)
        );
    }

    #[test]
    fn version_moves_on_every_change() {
        let f = fixture();
        let start = f.ledger.version();
        let claim = reserve(&f, dec!(1));
        let after_create = f.ledger.version();
        f.ledger.release(claim.id(), &f.catalog).unwrap();

        assert!(after_create > start);
        assert!(f.ledger.version() > after_create);
    }

    #[test]
    fn restore_replaces_claims() {
        let f = fixture();
        let claim = reserve(&f, dec!(1));

        let restored = ClaimLedger::new();
        restored.restore(f.ledger.all());
        assert_eq!(restored.get(claim.id()).unwrap(), claim);
        assert_eq!(
            restored.reserved_quantity(f.freezer.id(), &f.beef.id, &f.lb),
            dec!(1)
        );
    }
}

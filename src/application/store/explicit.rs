//! Quantity-tracked store.

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{InventorySource, ReservationRequest};
use crate::application::ledger::ClaimLedger;
use crate::domain::{
    availability::Availability,
    claim::{Claim, ClaimSource},
    id::{IngredientId, StoreId},
    ingredient::Ingredient,
    quantity::{Quantity, Unit},
    store::{Inventory, StoreKind, StoreRecord},
};
use crate::error::PlannerError;

/// Store whose contents are enumerated with explicit quantities.
///
/// Physical stock only changes through [`add_stock`](Self::add_stock),
/// [`remove_stock`](Self::remove_stock) and claim consumption. Reservations
/// are virtual: they live in the ledger and are subtracted on read.
///
/// The inventory mutex is the single-writer point for this store. Every
/// reserve, consume and release touching the store runs while holding it,
/// so concurrent reservations can never jointly exceed what is stocked.
pub struct ExplicitStore {
    id: StoreId,
    name: String,
    priority: i32,
    sequence: u64,
    inventory: Mutex<Inventory>,
}

impl ExplicitStore {
    pub(crate) fn new(
        id: StoreId,
        name: String,
        priority: i32,
        sequence: u64,
        inventory: Inventory,
    ) -> Self {
        Self {
            id,
            name,
            priority,
            sequence,
            inventory: Mutex::new(inventory),
        }
    }

    /// Take the store's writer lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock()
    }

    /// Physical quantity on the shelf.
    #[must_use]
    pub fn stocked(&self, ingredient: &IngredientId, unit: &Unit) -> Quantity {
        self.inventory.lock().stocked(ingredient, unit)
    }

    /// Stocked minus currently reserved quantity.
    #[must_use]
    pub fn remaining(&self, ingredient: &IngredientId, unit: &Unit, ledger: &ClaimLedger) -> Quantity {
        let inventory = self.inventory.lock();
        self.remaining_locked(&inventory, ingredient, unit, ledger)
    }

    fn remaining_locked(
        &self,
        inventory: &Inventory,
        ingredient: &IngredientId,
        unit: &Unit,
        ledger: &ClaimLedger,
    ) -> Quantity {
        inventory.stocked(ingredient, unit) - ledger.reserved_quantity(&self.id, ingredient, unit)
    }

    /// Add physical stock. Each call adds; nothing is deduplicated.
    ///
    /// Returns the new stocked quantity for the line.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidQuantity`] if `quantity` is not positive.
    pub fn add_stock(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: Unit,
        note: Option<String>,
    ) -> Result<Quantity, PlannerError> {
        let mut inventory = self.inventory.lock();
        let total = inventory.add(ingredient.id.clone(), quantity, unit.clone(), note)?;
        info!(
            store = %self.name,
            ingredient = %ingredient.canonical_name,
            added = %quantity,
            unit = %unit,
            total = %total,
            "Stock added"
        );
        Ok(total)
    }

    /// Remove physical stock that is not reserved.
    ///
    /// Returns the new stocked quantity for the line.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::StockReserved`] if the removal would leave
    /// less than the reserved quantity, or [`PlannerError::InvalidQuantity`]
    /// for non-positive amounts or amounts above what is stocked.
    pub fn remove_stock(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: &Unit,
        ledger: &ClaimLedger,
    ) -> Result<Quantity, PlannerError> {
        let mut inventory = self.inventory.lock();
        let reserved = ledger.reserved_quantity(&self.id, &ingredient.id, unit);
        let stocked = inventory.stocked(&ingredient.id, unit);
        if quantity > Decimal::ZERO && quantity <= stocked && stocked - quantity < reserved {
            return Err(PlannerError::StockReserved {
                store: self.id.clone(),
                unit: unit.clone(),
                requested: quantity,
                reserved,
            });
        }
        let left = inventory.remove(&ingredient.id, quantity, unit)?;
        info!(
            store = %self.name,
            ingredient = %ingredient.canonical_name,
            removed = %quantity,
            unit = %unit,
            total = %left,
            "Stock removed"
        );
        Ok(left)
    }
}

#[async_trait]
impl InventorySource for ExplicitStore {
    fn id(&self) -> &StoreId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    async fn check_availability(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: &Unit,
        ledger: &ClaimLedger,
    ) -> Availability {
        let remaining = self.remaining(&ingredient.id, unit, ledger).max(Decimal::ZERO);
        debug!(
            store = %self.name,
            ingredient = %ingredient.canonical_name,
            requested = %quantity,
            remaining = %remaining,
            "Explicit availability checked"
        );
        if remaining >= quantity {
            Availability::Available
        } else {
            Availability::Insufficient {
                available: remaining,
            }
        }
    }

    fn attempt_reserve(
        &self,
        request: ReservationRequest<'_>,
        ledger: &ClaimLedger,
    ) -> Result<Option<Claim>, PlannerError> {
        let inventory = self.inventory.lock();
        let remaining =
            self.remaining_locked(&inventory, &request.ingredient.id, request.unit, ledger);
        if remaining < Decimal::ZERO {
            return Err(PlannerError::ConcurrentReservationConflict {
                store: self.id.clone(),
                reason: format!(
                    "{} {} of {} reserved beyond stock",
                    -remaining, request.unit, request.ingredient.canonical_name
                ),
            });
        }

        let take = remaining.min(request.quantity);
        if take <= Decimal::ZERO {
            return Ok(None);
        }

        // Created while the inventory lock is still held.
        let claim = ledger.create_claim(
            request.ingredient.id.clone(),
            take,
            request.unit.clone(),
            request.recipe.clone(),
            Some(self.id.clone()),
            ClaimSource::Stock,
        )?;
        drop(inventory);
        Ok(Some(claim))
    }

    fn record(&self) -> StoreRecord {
        StoreRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            priority: self.priority,
            sequence: self.sequence,
            kind: StoreKind::Explicit {
                inventory: self.inventory.lock().clone(),
            },
        }
    }
}

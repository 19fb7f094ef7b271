//! Store hierarchy: inventory sources consulted by the resolver.
//!
//! Both store variants share one capability contract,
//! [`InventorySource`], but keep disjoint internal state:
//!
//! - [`ExplicitStore`] - quantity-tracked lines behind a per-store lock.
//!   Availability is virtual: stocked quantity minus active reservations.
//! - [`DefinitionStore`] - a description read by availability inference.
//!   Never reserved against and never decremented.
//!
//! [`StoreCatalog`] owns every store and hands them out in priority order.

mod catalog;
mod definition;
mod explicit;

use async_trait::async_trait;

use crate::application::ledger::ClaimLedger;
use crate::domain::{
    availability::Availability,
    claim::Claim,
    id::{RecipeId, StoreId},
    ingredient::Ingredient,
    quantity::{Quantity, Unit},
    store::StoreRecord,
};
use crate::error::PlannerError;

pub use catalog::{Store, StoreCatalog};
pub use definition::DefinitionStore;
pub use explicit::ExplicitStore;

/// A request to hold part of a requirement against one store.
#[derive(Debug, Clone, Copy)]
pub struct ReservationRequest<'a> {
    pub ingredient: &'a Ingredient,
    pub quantity: Quantity,
    pub unit: &'a Unit,
    pub recipe: &'a RecipeId,
}

/// Capability contract shared by every store variant.
#[async_trait]
pub trait InventorySource: Send + Sync {
    fn id(&self) -> &StoreId;

    fn name(&self) -> &str;

    /// Higher priorities are consulted first.
    fn priority(&self) -> i32;

    /// Creation order; breaks priority ties.
    fn sequence(&self) -> u64;

    /// Report whether `quantity` of `ingredient` can be covered.
    async fn check_availability(
        &self,
        ingredient: &Ingredient,
        quantity: Quantity,
        unit: &Unit,
        ledger: &ClaimLedger,
    ) -> Availability;

    /// Reserve as much of the request as this store can cover.
    ///
    /// Returns `None` when nothing was reserved.
    ///
    /// # Errors
    ///
    /// Returns an error if reserving would break the store's invariants.
    fn attempt_reserve(
        &self,
        request: ReservationRequest<'_>,
        ledger: &ClaimLedger,
    ) -> Result<Option<Claim>, PlannerError>;

    /// Snapshot for persistence and listings.
    fn record(&self) -> StoreRecord;
}

/// Sort key giving the resolver's visiting order.
pub(crate) fn visiting_order(source: &dyn InventorySource) -> (std::cmp::Reverse<i32>, u64) {
    (std::cmp::Reverse(source.priority()), source.sequence())
}

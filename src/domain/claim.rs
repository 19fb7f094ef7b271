//! Claims: recipe-scoped reservations of ingredient quantities.
//!
//! A claim starts `Reserved` and ends in exactly one terminal state:
//!
//! ```text
//! Reserved ──consume──▶ Consumed
//!     │
//!     └─────release──▶ Released
//! ```
//!
//! Terminal claims are never reactivated; re-planning creates new claims.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{ClaimId, IngredientId, RecipeId, StoreId};
use super::quantity::{Quantity, Unit};

/// Lifecycle state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimState {
    /// Quantity is held for the recipe.
    Reserved,
    /// Recipe was cooked; explicit stock was decremented.
    Consumed,
    /// Recipe was abandoned; quantity was freed.
    Released,
}

impl ClaimState {
    /// Stable name used in logs and persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Consumed => "consumed",
            Self::Released => "released",
        }
    }

    /// Parse a persisted state name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reserved" => Some(Self::Reserved),
            "consumed" => Some(Self::Consumed),
            "released" => Some(Self::Released),
            _ => None,
        }
    }

    /// Return true for Consumed and Released.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Reserved)
    }
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a claim's quantity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClaimSource {
    /// Held against tracked quantity in an explicit store.
    Stock,
    /// Unmet remainder recorded as shopping need. Never touches stock.
    Provisional {
        /// Inferred confidence that the attributed store already has the
        /// ingredient, when inference produced a verdict.
        presence_confidence: Option<f64>,
    },
}

impl ClaimSource {
    /// Return true for provisional (shopping need) claims.
    #[must_use]
    pub const fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional { .. })
    }
}

/// A reservation of one ingredient quantity for one recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    id: ClaimId,
    ingredient_id: IngredientId,
    quantity: Quantity,
    unit: Unit,
    store_id: Option<StoreId>,
    recipe_id: RecipeId,
    state: ClaimState,
    source: ClaimSource,
    created_at: DateTime<Utc>,
}

/// Every field of a claim, used to rebuild one from persisted state.
#[derive(Debug, Clone)]
pub struct ClaimParts {
    pub id: ClaimId,
    pub ingredient_id: IngredientId,
    pub quantity: Quantity,
    pub unit: Unit,
    pub store_id: Option<StoreId>,
    pub recipe_id: RecipeId,
    pub state: ClaimState,
    pub source: ClaimSource,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Create a new claim in the `Reserved` state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] if `quantity` is not positive.
    pub fn reserve(
        ingredient_id: IngredientId,
        quantity: Quantity,
        unit: Unit,
        store_id: Option<StoreId>,
        recipe_id: RecipeId,
        source: ClaimSource,
    ) -> Result<Self, DomainError> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        Ok(Self {
            id: ClaimId::new(),
            ingredient_id,
            quantity,
            unit,
            store_id,
            recipe_id,
            state: ClaimState::Reserved,
            source,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a claim from persisted parts.
    #[must_use]
    pub fn from_parts(parts: ClaimParts) -> Self {
        Self {
            id: parts.id,
            ingredient_id: parts.ingredient_id,
            quantity: parts.quantity,
            unit: parts.unit,
            store_id: parts.store_id,
            recipe_id: parts.recipe_id,
            state: parts.state,
            source: parts.source,
            created_at: parts.created_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ClaimId {
        &self.id
    }

    #[must_use]
    pub const fn ingredient_id(&self) -> &IngredientId {
        &self.ingredient_id
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    #[must_use]
    pub const fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Store the quantity is attributed to, `None` for an unattributed remainder.
    #[must_use]
    pub const fn store_id(&self) -> Option<&StoreId> {
        self.store_id.as_ref()
    }

    #[must_use]
    pub const fn recipe_id(&self) -> &RecipeId {
        &self.recipe_id
    }

    #[must_use]
    pub const fn state(&self) -> ClaimState {
        self.state
    }

    #[must_use]
    pub const fn source(&self) -> ClaimSource {
        self.source
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return true while the claim still holds its quantity.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self.state, ClaimState::Reserved)
    }

    /// Return true if this claim holds explicit stock.
    #[must_use]
    pub const fn holds_stock(&self) -> bool {
        matches!(self.source, ClaimSource::Stock)
    }

    /// Move Reserved -> Consumed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidClaimTransition`] if the claim is not reserved.
    pub fn consume(&mut self) -> Result<(), DomainError> {
        self.transition(ClaimState::Consumed)
    }

    /// Move Reserved -> Released.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidClaimTransition`] if the claim is not reserved.
    pub fn release(&mut self) -> Result<(), DomainError> {
        self.transition(ClaimState::Released)
    }

    /// Check that a move to `to` is legal without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidClaimTransition`] if the claim is not reserved
    /// or `to` is not a terminal state.
    pub fn check_transition(&self, to: ClaimState) -> Result<(), DomainError> {
        if self.state.is_terminal() || !to.is_terminal() {
            return Err(DomainError::InvalidClaimTransition {
                claim: self.id.clone(),
                from: self.state,
                to,
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: ClaimState) -> Result<(), DomainError> {
        self.check_transition(to)?;
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_claim() -> Claim {
        Claim::reserve(
            IngredientId::from("beef"),
            dec!(2),
            Unit::new("lb"),
            Some(StoreId::from("freezer")),
            RecipeId::from("recipe-1"),
            ClaimSource::Stock,
        )
        .unwrap()
    }

    #[test]
    fn reserve_rejects_non_positive_quantity() {
        for quantity in [dec!(0), dec!(-1)] {
            let result = Claim::reserve(
                IngredientId::new(),
                quantity,
                Unit::new("lb"),
                None,
                RecipeId::new(),
                ClaimSource::Stock,
            );
            assert_eq!(result, Err(DomainError::InvalidQuantity { quantity }));
        }
    }

    #[test]
    fn new_claim_is_reserved() {
        let claim = make_claim();
        assert!(claim.is_reserved());
        assert!(claim.holds_stock());
        assert_eq!(claim.quantity(), dec!(2));
    }

    #[test]
    fn consume_is_terminal() {
        let mut claim = make_claim();
        claim.consume().unwrap();
        assert_eq!(claim.state(), ClaimState::Consumed);

        let err = claim.consume().unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidClaimTransition {
                from: ClaimState::Consumed,
                to: ClaimState::Consumed,
                ..
            }
        ));
    }

    #[test]
    fn release_after_consume_fails() {
        let mut claim = make_claim();
        claim.consume().unwrap();
        assert!(claim.release().is_err());
        assert_eq!(claim.state(), ClaimState::Consumed);
    }

    #[test]
    fn released_claim_cannot_be_consumed() {
        let mut claim = make_claim();
        claim.release().unwrap();
        assert!(claim.consume().is_err());
        assert_eq!(claim.state(), ClaimState::Released);
    }

    #[test]
    fn transition_back_to_reserved_is_refused() {
        let claim = make_claim();
        assert!(claim.check_transition(ClaimState::Reserved).is_err());
    }

    #[test]
    fn state_names_round_trip() {
        for state in [ClaimState::Reserved, ClaimState::Consumed, ClaimState::Released] {
            assert_eq!(ClaimState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ClaimState::parse("bogus"), None);
    }
}

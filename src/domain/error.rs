//! Domain validation errors for core domain types.
//!
//! These errors are returned when a domain invariant would be violated:
//! a non-positive claim quantity, an illegal claim or recipe state change,
//! or an out-of-range inference confidence.
//!
//! # Examples
//!
//! ```
//! use larder::domain::claim::{Claim, ClaimSource};
//! use larder::domain::error::DomainError;
//! use larder::domain::id::{IngredientId, RecipeId};
//! use larder::domain::quantity::Unit;
//! use rust_decimal_macros::dec;
//!
//! let result = Claim::reserve(
//!     IngredientId::new(),
//!     dec!(0),
//!     Unit::new("lb"),
//!     None,
//!     RecipeId::new(),
//!     ClaimSource::Stock,
//! );
//!
//! assert!(matches!(result, Err(DomainError::InvalidQuantity { .. })));
//! ```

use thiserror::Error;

use super::claim::ClaimState;
use super::id::{ClaimId, RecipeId};
use super::recipe::RecipeStatus;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Claimed or stocked quantities must be positive.
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity {
        /// The invalid quantity that was provided.
        quantity: rust_decimal::Decimal,
    },

    /// Claims only move Reserved -> Consumed or Reserved -> Released.
    #[error("claim {claim} cannot move from {from} to {to}")]
    InvalidClaimTransition {
        /// The claim whose transition was refused.
        claim: ClaimId,
        /// State the claim is currently in.
        from: ClaimState,
        /// State that was requested.
        to: ClaimState,
    },

    /// Recipes only move forward and never leave Cooked or Abandoned.
    #[error("recipe {recipe} cannot move from {from} to {to}")]
    InvalidRecipeTransition {
        /// The recipe whose transition was refused.
        recipe: RecipeId,
        /// Status the recipe is currently in.
        from: RecipeStatus,
        /// Status that was requested.
        to: RecipeStatus,
    },

    /// Names (stores, recipes, ingredients) cannot be blank.
    #[error("{field} cannot be empty")]
    EmptyName {
        /// Which name was empty.
        field: &'static str,
    },

    /// Inference confidences are probabilities.
    #[error("confidence must be between 0 and 1, got {confidence}")]
    InvalidConfidence {
        /// The out-of-range confidence.
        confidence: f64,
    },
}

//! Results of proposing a claim.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::claim::Claim;
use super::id::RecipeId;
use super::quantity::Quantity;

/// Why a proposal was refused outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Required quantity was zero or negative.
    InvalidQuantity { quantity: Quantity },
    /// The ingredient reference could not be resolved.
    UnknownIngredient { ingredient: String },
    /// The recipe is already Cooked or Abandoned.
    RecipeFinalized { recipe: RecipeId },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuantity { quantity } => {
                write!(f, "quantity must be positive, got {quantity}")
            }
            Self::UnknownIngredient { ingredient } => write!(f, "unknown ingredient: {ingredient}"),
            Self::RecipeFinalized { recipe } => write!(f, "recipe {recipe} is already finished"),
        }
    }
}

/// Outcome of negotiating one requirement across the stores.
///
/// Several claims may come back for one requirement when it was split across
/// explicit stores; callers treat them as one logical reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ClaimResult {
    /// Explicit stock covers the whole requirement.
    Accepted { claims: Vec<Claim> },
    /// Explicit stock covers part of it; `missing` was recorded as shopping need.
    Partial {
        /// Claims against explicit stock (possibly empty).
        claims: Vec<Claim>,
        /// Quantity explicit stock could not cover.
        missing: Quantity,
        /// Provisional claim recording the missing quantity.
        shortfall: Claim,
    },
    /// Nothing was reserved.
    Rejected(RejectReason),
}

impl ClaimResult {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Claims against explicit stock.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        match self {
            Self::Accepted { claims } | Self::Partial { claims, .. } => claims,
            Self::Rejected(_) => &[],
        }
    }

    /// Quantity covered by explicit stock.
    #[must_use]
    pub fn reserved_quantity(&self) -> Quantity {
        self.claims().iter().map(Claim::quantity).sum()
    }

    /// Quantity left as shopping need (zero unless partial).
    #[must_use]
    pub fn missing(&self) -> Quantity {
        match self {
            Self::Partial { missing, .. } => *missing,
            _ => Decimal::ZERO,
        }
    }

    /// The rejection reason, if rejected.
    #[must_use]
    pub const fn rejection(&self) -> Option<&RejectReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

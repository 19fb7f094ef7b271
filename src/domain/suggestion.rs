//! Point-in-time availability snapshots and suggestion revalidation types.
//!
//! Pitch generation runs against a snapshot while claims keep moving
//! underneath it. A suggestion carries the basis it was pitched on so it can
//! be checked against current state before anyone acts on it.

use serde::{Deserialize, Serialize};

use super::id::{IngredientId, StoreId};
use super::quantity::{Quantity, Unit};

/// Remaining (unreserved) quantity of one explicit inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub store_id: StoreId,
    pub store_name: String,
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub unit: Unit,
    pub remaining: Quantity,
}

/// Explicit availability at one ledger version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Ledger version the snapshot was taken at.
    pub version: u64,
    /// Lines with positive remaining quantity, in store priority order.
    pub lines: Vec<InventoryLine>,
}

/// Explicit coverage of one requirement at pitch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCoverage {
    /// `None` for ingredients nobody has stocked or claimed yet.
    pub ingredient_id: Option<IngredientId>,
    pub ingredient_name: String,
    pub unit: Unit,
    pub required: Quantity,
    /// How much of `required` explicit stock could cover.
    pub coverable: Quantity,
}

/// What a pitched suggestion assumed about inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionBasis {
    pub version: u64,
    pub requirements: Vec<RequirementCoverage>,
}

/// A requirement whose coverage dropped since the suggestion was pitched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageShortfall {
    pub ingredient_name: String,
    pub unit: Unit,
    pub assumed: Quantity,
    pub current: Quantity,
}

/// Result of revalidating a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SuggestionValidity {
    /// Everything the suggestion assumed still holds.
    Current,
    /// Inventory moved; the suggestion is invalid and must be re-pitched.
    Stale { shortfalls: Vec<CoverageShortfall> },
}

impl SuggestionValidity {
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }
}

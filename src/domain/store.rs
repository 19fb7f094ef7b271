//! Store records and explicit inventory lines.
//!
//! Stores come in two disjoint shapes. Explicit stores enumerate what they
//! hold as quantity-tracked lines; definition stores only carry a
//! description that availability inference reads.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{IngredientId, StoreId};
use super::quantity::{Quantity, Unit};

/// Label of a definition-based store, which decides its shopping list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// Somewhere things are bought ("general store", "farmers market").
    Grocery,
    /// Staples the household usually keeps on hand.
    Pantry,
}

impl DefinitionKind {
    /// Stable name used in logs and persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grocery => "grocery",
            Self::Pantry => "pantry",
        }
    }

    /// Parse a persisted kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "grocery" => Some(Self::Grocery),
            "pantry" => Some(Self::Pantry),
            _ => None,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked line of an explicit store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub ingredient_id: IngredientId,
    pub quantity: Quantity,
    pub unit: Unit,
    pub note: Option<String>,
}

/// Physical contents of an explicit store.
///
/// Lines are keyed by `(ingredient, unit)` and kept in insertion order.
/// Quantities in different units for the same ingredient stay on separate
/// lines and never count toward each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<StockItem>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild an inventory from persisted lines.
    #[must_use]
    pub fn from_items(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    /// Physical quantity stocked for `ingredient` in `unit`.
    #[must_use]
    pub fn stocked(&self, ingredient: &IngredientId, unit: &Unit) -> Quantity {
        self.line(ingredient, unit)
            .map_or(Decimal::ZERO, |item| item.quantity)
    }

    /// Add quantity to the matching line, creating it if absent.
    ///
    /// Repeated calls accumulate. A provided note replaces the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] if `quantity` is not positive.
    pub fn add(
        &mut self,
        ingredient: IngredientId,
        quantity: Quantity,
        unit: Unit,
        note: Option<String>,
    ) -> Result<Quantity, DomainError> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.ingredient_id == ingredient && i.unit == unit)
        {
            item.quantity += quantity;
            if note.is_some() {
                item.note = note;
            }
            return Ok(item.quantity);
        }
        self.items.push(StockItem {
            ingredient_id: ingredient,
            quantity,
            unit,
            note,
        });
        Ok(quantity)
    }

    /// Remove up to the stocked quantity from a line.
    ///
    /// Lines that reach zero are dropped. Returns the remaining quantity.
    /// Callers are responsible for not removing reserved quantity.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] if `quantity` is not positive
    /// or exceeds what is stocked.
    pub fn remove(
        &mut self,
        ingredient: &IngredientId,
        quantity: Quantity,
        unit: &Unit,
    ) -> Result<Quantity, DomainError> {
        if quantity <= Decimal::ZERO || quantity > self.stocked(ingredient, unit) {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        let remaining = self.stocked(ingredient, unit) - quantity;
        if remaining.is_zero() {
            self.items
                .retain(|i| !(i.ingredient_id == *ingredient && i.unit == *unit));
        } else if let Some(item) = self.line_mut(ingredient, unit) {
            item.quantity = remaining;
        }
        Ok(remaining)
    }

    fn line(&self, ingredient: &IngredientId, unit: &Unit) -> Option<&StockItem> {
        self.items
            .iter()
            .find(|i| i.ingredient_id == *ingredient && i.unit == *unit)
    }

    fn line_mut(&mut self, ingredient: &IngredientId, unit: &Unit) -> Option<&mut StockItem> {
        self.items
            .iter_mut()
            .find(|i| i.ingredient_id == *ingredient && i.unit == *unit)
    }
}

/// Variant-specific state of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreKind {
    /// Quantity-tracked inventory.
    Explicit { inventory: Inventory },
    /// Availability inferred from a natural-language description.
    Definition {
        kind: DefinitionKind,
        description: String,
    },
}

/// Snapshot of a store, used for persistence and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: StoreId,
    pub name: String,
    /// Higher priorities are consulted first.
    pub priority: i32,
    /// Creation order; breaks priority ties.
    pub sequence: u64,
    pub kind: StoreKind,
}

impl StoreRecord {
    /// Return true for quantity-tracked stores.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self.kind, StoreKind::Explicit { .. })
    }
}

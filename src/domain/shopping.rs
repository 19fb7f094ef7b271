//! Shopping list view types.

use serde::{Deserialize, Serialize};

use super::quantity::{Quantity, Unit};

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub ingredient_name: String,
    pub unit: Unit,
    pub aggregated_quantity: Quantity,
    /// Likelihood the household actually needs to buy this (0..=1).
    pub purchase_likelihood: f64,
    /// Recipes that contributed, in first-contribution order.
    pub recipe_names: Vec<String>,
}

/// Purchase view derived from outstanding provisional claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub grocery_items: Vec<ShoppingListEntry>,
    pub pantry_staples: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Return true when there is nothing to buy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grocery_items.is_empty() && self.pantry_staples.is_empty()
    }

    /// Total number of entries across both views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grocery_items.len() + self.pantry_staples.len()
    }
}

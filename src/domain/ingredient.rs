//! Canonical ingredient identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::IngredientId;
use super::quantity::{Quantity, Unit};

/// A canonical ingredient.
///
/// Created lazily the first time a raw name normalizes to a new canonical
/// name, and never deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Stable identifier.
    pub id: IngredientId,
    /// Normalized name (e.g., "ground beef").
    pub canonical_name: String,
    /// Unit used when a caller mentions the ingredient without one.
    pub default_unit: Unit,
}

impl Ingredient {
    /// Create a new ingredient with a generated identifier.
    #[must_use]
    pub fn new(canonical_name: impl Into<String>, default_unit: Unit) -> Self {
        Self {
            id: IngredientId::new(),
            canonical_name: canonical_name.into(),
            default_unit,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name)
    }
}

/// How a caller refers to an ingredient.
///
/// Callers either already hold a canonical id, or pass the raw name the
/// recipe generator produced and let the registry normalize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientRef {
    /// A canonical ingredient id.
    Id(IngredientId),
    /// A raw, un-normalized name.
    Name(String),
}

impl IngredientRef {
    /// Refer to an ingredient by raw name.
    pub fn name(raw: impl Into<String>) -> Self {
        Self::Name(raw.into())
    }
}

impl From<IngredientId> for IngredientRef {
    fn from(id: IngredientId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for IngredientRef {
    fn from(raw: &str) -> Self {
        Self::Name(raw.to_string())
    }
}

impl fmt::Display for IngredientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One ingredient requirement from a recipe, in the order the generator listed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Ingredient being required.
    pub ingredient: IngredientRef,
    /// Required amount.
    pub quantity: Quantity,
    /// Unit of `quantity`.
    pub unit: Unit,
}

impl Requirement {
    /// Create a new requirement.
    pub fn new(ingredient: impl Into<IngredientRef>, quantity: Quantity, unit: impl Into<Unit>) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ingredient_ref_from_str_is_name() {
        let r = IngredientRef::from("Ground Beef");
        assert_eq!(r, IngredientRef::Name("Ground Beef".into()));
    }

    #[test]
    fn requirement_normalizes_unit() {
        let req = Requirement::new("carrots", dec!(1.5), "LB");
        assert_eq!(req.unit, Unit::new("lb"));
    }
}

//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{claims, ingredients, recipes, stores};

/// Database row for an ingredient.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IngredientRow {
    pub id: String,
    pub canonical_name: String,
    pub default_unit: String,
}

/// Database row for a store.
///
/// `kind` is `explicit`, `grocery` or `pantry`. Explicit stores fill
/// `inventory` with a JSON array of stock lines; definition stores fill
/// `description`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = stores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoreRow {
    pub id: String,
    pub name: String,
    pub priority: i32,
    pub sequence: i64,
    pub kind: String,
    pub description: Option<String>,
    pub inventory: Option<String>,
}

/// Database row for a recipe.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeRow {
    pub id: String,
    pub session_id: String,
    pub name: String,
    pub status: String,
    pub sequence: i64,
    pub selected_at: String,
}

/// Database row for a claim.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = claims)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClaimRow {
    pub id: String,
    pub ingredient_id: String,
    /// Decimal string, kept exact.
    pub quantity: String,
    pub unit: String,
    pub store_id: Option<String>,
    pub recipe_id: String,
    pub state: String,
    /// JSON-encoded claim source.
    pub source: String,
    pub created_at: String,
}

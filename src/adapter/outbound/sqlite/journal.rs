//! SQLite planner journal.
//!
//! Persists ingredients, stores, recipes and claims using SQLite and Diesel
//! ORM. Every write is an upsert keyed by the record id.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    ClaimRow, IngredientRow, RecipeRow, StoreRow,
};
use crate::adapter::outbound::sqlite::database::schema::{claims, ingredients, recipes, stores};
use crate::domain::claim::{Claim, ClaimParts, ClaimSource, ClaimState};
use crate::domain::id::{ClaimId, IngredientId, RecipeId, SessionId, StoreId};
use crate::domain::ingredient::Ingredient;
use crate::domain::quantity::Unit;
use crate::domain::recipe::{Recipe, RecipeStatus};
use crate::domain::store::{DefinitionKind, Inventory, StoreKind, StoreRecord};
use crate::error::{Error, Result};
use crate::port::outbound::journal::{PlannerJournal, PlannerSnapshot};

const EXPLICIT: &str = "explicit";

/// SQLite-backed planner journal.
pub struct SqliteJournal {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteJournal {
    /// Create a journal over a pool whose migrations have already run.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn ingredient_to_row(ingredient: &Ingredient) -> IngredientRow {
        IngredientRow {
            id: ingredient.id.to_string(),
            canonical_name: ingredient.canonical_name.clone(),
            default_unit: ingredient.default_unit.to_string(),
        }
    }

    fn ingredient_from_row(row: IngredientRow) -> Ingredient {
        Ingredient {
            id: IngredientId::from(row.id),
            canonical_name: row.canonical_name,
            default_unit: Unit::new(row.default_unit),
        }
    }

    fn store_to_row(store: &StoreRecord) -> Result<StoreRow> {
        let (kind, description, inventory) = match &store.kind {
            StoreKind::Explicit { inventory } => (
                EXPLICIT.to_string(),
                None,
                Some(serde_json::to_string(inventory)?),
            ),
            StoreKind::Definition { kind, description } => {
                (kind.as_str().to_string(), Some(description.clone()), None)
            }
        };
        Ok(StoreRow {
            id: store.id.to_string(),
            name: store.name.clone(),
            priority: store.priority,
            sequence: to_i64(store.sequence)?,
            kind,
            description,
            inventory,
        })
    }

    fn store_from_row(row: StoreRow) -> Result<StoreRecord> {
        let kind = if row.kind == EXPLICIT {
            let inventory: Inventory = match row.inventory {
                Some(json) => serde_json::from_str(&json)?,
                None => Inventory::new(),
            };
            StoreKind::Explicit { inventory }
        } else {
            let kind = DefinitionKind::parse(&row.kind)
                .ok_or_else(|| Error::Parse(format!("unknown store kind: {}", row.kind)))?;
            StoreKind::Definition {
                kind,
                description: row.description.unwrap_or_default(),
            }
        };
        Ok(StoreRecord {
            id: StoreId::from(row.id),
            name: row.name,
            priority: row.priority,
            sequence: to_u64(row.sequence)?,
            kind,
        })
    }

    fn recipe_to_row(recipe: &Recipe) -> Result<RecipeRow> {
        Ok(RecipeRow {
            id: recipe.id.to_string(),
            session_id: recipe.session_id.to_string(),
            name: recipe.name.clone(),
            status: recipe.status.as_str().to_string(),
            sequence: to_i64(recipe.sequence)?,
            selected_at: timestamp(recipe.selected_at),
        })
    }

    fn recipe_from_row(row: RecipeRow) -> Result<Recipe> {
        let status = RecipeStatus::parse(&row.status)
            .ok_or_else(|| Error::Parse(format!("unknown recipe status: {}", row.status)))?;
        Ok(Recipe {
            id: RecipeId::from(row.id),
            session_id: SessionId::from(row.session_id),
            name: row.name,
            status,
            sequence: to_u64(row.sequence)?,
            selected_at: parse_timestamp(&row.selected_at)?,
        })
    }

    fn claim_to_row(claim: &Claim) -> Result<ClaimRow> {
        Ok(ClaimRow {
            id: claim.id().to_string(),
            ingredient_id: claim.ingredient_id().to_string(),
            quantity: claim.quantity().to_string(),
            unit: claim.unit().to_string(),
            store_id: claim.store_id().map(ToString::to_string),
            recipe_id: claim.recipe_id().to_string(),
            state: claim.state().as_str().to_string(),
            source: serde_json::to_string(&claim.source())?,
            created_at: timestamp(claim.created_at()),
        })
    }

    fn claim_from_row(row: ClaimRow) -> Result<Claim> {
        let quantity = Decimal::from_str(&row.quantity)
            .map_err(|e| Error::Parse(format!("invalid claim quantity {}: {e}", row.quantity)))?;
        let state = ClaimState::parse(&row.state)
            .ok_or_else(|| Error::Parse(format!("unknown claim state: {}", row.state)))?;
        let source: ClaimSource = serde_json::from_str(&row.source)?;
        Ok(Claim::from_parts(ClaimParts {
            id: ClaimId::from(row.id),
            ingredient_id: IngredientId::from(row.ingredient_id),
            quantity,
            unit: Unit::new(row.unit),
            store_id: row.store_id.map(StoreId::from),
            recipe_id: RecipeId::from(row.recipe_id),
            state,
            source,
            created_at: parse_timestamp(&row.created_at)?,
        }))
    }
}

/// Fixed-width RFC 3339 so text order matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::Parse(e.to_string()))?
        .with_timezone(&Utc))
}

fn to_i64(sequence: u64) -> Result<i64> {
    i64::try_from(sequence).map_err(|e| Error::Parse(format!("sequence {sequence}: {e}")))
}

fn to_u64(sequence: i64) -> Result<u64> {
    u64::try_from(sequence).map_err(|e| Error::Parse(format!("sequence {sequence}: {e}")))
}

impl PlannerJournal for SqliteJournal {
    fn record_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        let row = Self::ingredient_to_row(ingredient);
        diesel::replace_into(ingredients::table)
            .values(&row)
            .execute(&mut self.conn()?)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn record_store(&self, store: &StoreRecord) -> Result<()> {
        let row = Self::store_to_row(store)?;
        diesel::replace_into(stores::table)
            .values(&row)
            .execute(&mut self.conn()?)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn record_recipe(&self, recipe: &Recipe) -> Result<()> {
        let row = Self::recipe_to_row(recipe)?;
        diesel::replace_into(recipes::table)
            .values(&row)
            .execute(&mut self.conn()?)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn record_claims(&self, batch: &[Claim]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let rows = batch
            .iter()
            .map(Self::claim_to_row)
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::replace_into(claims::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn load(&self) -> Result<PlannerSnapshot> {
        let mut conn = self.conn()?;

        let ingredient_rows: Vec<IngredientRow> = ingredients::table
            .order(ingredients::canonical_name.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let store_rows: Vec<StoreRow> = stores::table
            .order(stores::sequence.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let recipe_rows: Vec<RecipeRow> = recipes::table
            .order(recipes::sequence.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let claim_rows: Vec<ClaimRow> = claims::table
            .order((claims::created_at.asc(), claims::id.asc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(PlannerSnapshot {
            ingredients: ingredient_rows
                .into_iter()
                .map(Self::ingredient_from_row)
                .collect(),
            stores: store_rows
                .into_iter()
                .map(Self::store_from_row)
                .collect::<Result<_>>()?,
            recipes: recipe_rows
                .into_iter()
                .map(Self::recipe_from_row)
                .collect::<Result<_>>()?,
            claims: claim_rows
                .into_iter()
                .map(Self::claim_from_row)
                .collect::<Result<_>>()?,
        })
    }
}

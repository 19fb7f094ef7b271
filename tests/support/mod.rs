//! Shared planner builders for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;

use larder::adapter::outbound::inference::StaticInference;
use larder::adapter::outbound::memory::MemoryJournal;
use larder::adapter::outbound::normalizer::BasicNormalizer;
use larder::application::config::{InferenceConfig, PlannerConfig};
use larder::application::planner::{Collaborators, MealPlanner};
use larder::domain::id::{RecipeId, SessionId, StoreId};
use larder::domain::ingredient::IngredientRef;
use larder::domain::quantity::Unit;
use larder::domain::store::DefinitionKind;
use larder::port::outbound::journal::PlannerJournal;

/// Planner over an in-memory journal with the given inference table.
pub fn planner(inference: StaticInference) -> MealPlanner {
    planner_with_journal(inference, Arc::new(MemoryJournal::new()))
}

/// Planner over `journal` with the given inference table.
pub fn planner_with_journal(
    inference: StaticInference,
    journal: Arc<dyn PlannerJournal>,
) -> MealPlanner {
    MealPlanner::new(
        &PlannerConfig::default(),
        &InferenceConfig::default(),
        Collaborators {
            inference: Arc::new(inference),
            normalizer: Arc::new(BasicNormalizer),
            journal,
        },
    )
}

/// Add an explicit store holding one stocked line.
pub fn stocked_store(
    planner: &MealPlanner,
    name: &str,
    priority: i32,
    ingredient: &str,
    quantity: Decimal,
    unit: &str,
) -> StoreId {
    let store = planner.add_explicit_store(name, priority).unwrap();
    planner
        .add_explicit_inventory(
            &store.id,
            &IngredientRef::name(ingredient),
            quantity,
            &Unit::new(unit),
            None,
        )
        .unwrap();
    store.id
}

/// Add a definition store.
pub fn definition_store(
    planner: &MealPlanner,
    name: &str,
    priority: i32,
    kind: DefinitionKind,
    description: &str,
) -> StoreId {
    planner
        .add_definition_store(name, priority, kind, description)
        .unwrap()
        .id
}

/// Select a recipe in `session`.
pub fn recipe(planner: &MealPlanner, session: &str, name: &str) -> RecipeId {
    planner
        .select_recipe(&SessionId::new(session), name)
        .unwrap()
        .id
}

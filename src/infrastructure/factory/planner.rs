//! Planner composition root.

use std::sync::Arc;

use tracing::info;

use super::{inference::build_inference, llm::build_llm_client, persistence::build_journal};
use crate::adapter::outbound::normalizer::BasicNormalizer;
use crate::application::config::InferenceConfig;
use crate::application::planner::{Collaborators, MealPlanner};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::journal::PlannerJournal;

/// Build a planner over the configured SQLite journal and load its state.
pub fn build_planner(config: &Config) -> Result<MealPlanner> {
    let journal = build_journal(config)?;
    build_planner_with_journal(config, journal)
}

/// Build a planner over `journal` and load its state.
///
/// Definition stores are only consulted when an LLM client could be built.
pub fn build_planner_with_journal(
    config: &Config,
    journal: Arc<dyn PlannerJournal>,
) -> Result<MealPlanner> {
    let llm = build_llm_client(config);
    let inference_config = InferenceConfig {
        enabled: llm.is_some(),
        ..config.inference.clone()
    };
    let inference = build_inference(llm);
    info!(inference = inference.name(), "Planner wiring");

    let planner = MealPlanner::new(
        &config.planner,
        &inference_config,
        Collaborators {
            inference,
            normalizer: Arc::new(BasicNormalizer),
            journal,
        },
    );
    planner.reload()?;
    Ok(planner)
}

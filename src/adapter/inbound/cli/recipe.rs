//! Handlers for `larder recipe`.

use serde_json::json;
use tabled::Tabled;

use super::command::{RecipeArg, RecipeSelectArgs, SessionArg};
use super::output;
use crate::application::planner::MealPlanner;
use crate::domain::claim::Claim;
use crate::domain::id::{RecipeId, SessionId};
use crate::domain::recipe::Recipe;
use crate::error::Result;

#[derive(Tabled)]
struct RecipeRow {
    #[tabled(rename = "Recipe")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Id")]
    id: String,
}

impl From<&Recipe> for RecipeRow {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            status: recipe.status.to_string(),
            id: recipe.id.to_string(),
        }
    }
}

/// Execute `recipe select`.
pub fn select(planner: &MealPlanner, args: &RecipeSelectArgs) -> Result<()> {
    let recipe = planner.select_recipe(&SessionId::new(&args.session), &args.name)?;
    if output::is_json() {
        output::json_output(json!({ "command": "recipe.select", "recipe": recipe }));
        return Ok(());
    }
    output::success(&format!("Selected {}", output::highlight(&recipe.name)));
    output::field("Id", &recipe.id);
    output::field("Session", &recipe.session_id);
    Ok(())
}

/// Execute `recipe cook`.
pub fn cook(planner: &MealPlanner, args: &RecipeArg) -> Result<()> {
    let settled = planner.consume_claims_for_recipe(&RecipeId::from(args.recipe.as_str()))?;
    finished(planner, args, "recipe.cook", "Cooked", &settled)
}

/// Execute `recipe abandon`.
pub fn abandon(planner: &MealPlanner, args: &RecipeArg) -> Result<()> {
    let settled = planner.release_claims_for_recipe(&RecipeId::from(args.recipe.as_str()))?;
    finished(planner, args, "recipe.abandon", "Abandoned", &settled)
}

/// Execute `recipe list`.
pub fn list(planner: &MealPlanner, args: &SessionArg) -> Result<()> {
    let recipes = planner.recipes_in_session(&SessionId::new(&args.session));
    if output::is_json() {
        output::json_output(json!({ "command": "recipe.list", "recipes": recipes }));
        return Ok(());
    }
    output::section(&format!("Session {}", args.session));
    output::table(
        recipes.iter().map(RecipeRow::from).collect(),
        "(no recipes selected)",
    );
    Ok(())
}

fn finished(
    planner: &MealPlanner,
    args: &RecipeArg,
    command: &str,
    verb: &str,
    settled: &[Claim],
) -> Result<()> {
    let recipe = planner.recipe(&RecipeId::from(args.recipe.as_str()))?;
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "recipe": recipe,
            "claims": settled,
        }));
        return Ok(());
    }
    output::success(&format!(
        "{verb} {} ({} claims settled)",
        output::highlight(&recipe.name),
        settled.len()
    ));
    Ok(())
}

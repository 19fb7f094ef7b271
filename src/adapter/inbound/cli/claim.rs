//! Handlers for `larder claim`.

use serde_json::json;
use tabled::Tabled;

use super::command::{ClaimArg, ClaimProposeArgs, RecipeArg};
use super::output;
use crate::application::planner::MealPlanner;
use crate::domain::claim::{Claim, ClaimSource};
use crate::domain::id::{ClaimId, RecipeId};
use crate::domain::ingredient::IngredientRef;
use crate::domain::outcome::ClaimResult;
use crate::domain::quantity::Unit;
use crate::error::Result;

#[derive(Tabled)]
struct ClaimRow {
    #[tabled(rename = "Ingredient")]
    ingredient: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Id")]
    id: String,
}

fn row(planner: &MealPlanner, claim: &Claim) -> ClaimRow {
    let ingredient = planner.ingredient_name(claim.ingredient_id());
    let store = claim
        .store_id()
        .map_or_else(|| "-".to_string(), |id| {
            planner.store(id).map_or_else(|_| id.to_string(), |s| s.name)
        });
    let source = match claim.source() {
        ClaimSource::Stock => "stock".to_string(),
        ClaimSource::Provisional {
            presence_confidence: Some(confidence),
        } => format!("to buy ({} present)", output::percent(confidence)),
        ClaimSource::Provisional {
            presence_confidence: None,
        } => "to buy".to_string(),
    };
    ClaimRow {
        ingredient,
        quantity: format!("{} {}", claim.quantity(), claim.unit()),
        store,
        source,
        state: claim.state().to_string(),
        id: claim.id().to_string(),
    }
}

/// Execute `claim propose`.
pub async fn propose(planner: &MealPlanner, args: &ClaimProposeArgs) -> Result<()> {
    let result = planner
        .propose_claim(
            &IngredientRef::name(&args.ingredient),
            args.quantity,
            &Unit::new(&args.unit),
            &RecipeId::from(args.recipe.as_str()),
        )
        .await?;

    if output::is_json() {
        output::json_output(json!({ "command": "claim.propose", "result": result }));
        return Ok(());
    }

    match &result {
        ClaimResult::Accepted { claims } => {
            output::success(&format!("Reserved {} {}", args.quantity, args.unit));
            output::table(claims.iter().map(|c| row(planner, c)).collect(), "");
        }
        ClaimResult::Partial {
            claims,
            missing,
            shortfall,
        } => {
            output::warning(&format!(
                "Short {missing} {} of {}",
                args.unit, args.ingredient
            ));
            let mut rows: Vec<_> = claims.iter().map(|c| row(planner, c)).collect();
            rows.push(row(planner, shortfall));
            output::table(rows, "");
        }
        ClaimResult::Rejected(reason) => {
            output::warning(&format!("Rejected: {reason}"));
        }
    }
    Ok(())
}

/// Execute `claim release`.
pub fn release(planner: &MealPlanner, args: &ClaimArg) -> Result<()> {
    let claim = planner.release_claim(&ClaimId::from(args.claim.as_str()))?;
    settled(planner, "claim.release", "Released", &claim);
    Ok(())
}

/// Execute `claim consume`.
pub fn consume(planner: &MealPlanner, args: &ClaimArg) -> Result<()> {
    let claim = planner.consume_claim(&ClaimId::from(args.claim.as_str()))?;
    settled(planner, "claim.consume", "Consumed", &claim);
    Ok(())
}

/// Execute `claim list`.
pub fn list(planner: &MealPlanner, args: &RecipeArg) -> Result<()> {
    let recipe = planner.recipe(&RecipeId::from(args.recipe.as_str()))?;
    let claims = planner.claims_for_recipe(&recipe.id);
    if output::is_json() {
        output::json_output(json!({ "command": "claim.list", "recipe": recipe, "claims": claims }));
        return Ok(());
    }
    output::section(&format!("{} ({})", recipe.name, recipe.status));
    output::table(
        claims.iter().map(|c| row(planner, c)).collect(),
        "(no claims)",
    );
    Ok(())
}

fn settled(planner: &MealPlanner, command: &str, verb: &str, claim: &Claim) {
    if output::is_json() {
        output::json_output(json!({ "command": command, "claim": claim }));
        return;
    }
    let row = row(planner, claim);
    output::success(&format!("{verb} {} {}", row.quantity, row.ingredient));
}

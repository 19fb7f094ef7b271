//! Handlers for `larder stock`.

use serde_json::json;

use super::command::{StockAddArgs, StockLineArgs};
use super::{lookup_store, output};
use crate::application::planner::MealPlanner;
use crate::domain::ingredient::IngredientRef;
use crate::domain::quantity::Unit;
use crate::error::Result;

/// Execute `stock add`.
pub fn add(planner: &MealPlanner, args: &StockAddArgs) -> Result<()> {
    let line = &args.line;
    let store = lookup_store(planner, &line.store)?;
    let unit = Unit::new(&line.unit);
    let total = planner.add_explicit_inventory(
        &store.id,
        &IngredientRef::name(&line.ingredient),
        line.quantity,
        &unit,
        args.note.clone(),
    )?;
    report("stock.add", &store.name, line, &unit, total);
    Ok(())
}

/// Execute `stock remove`.
pub fn remove(planner: &MealPlanner, line: &StockLineArgs) -> Result<()> {
    let store = lookup_store(planner, &line.store)?;
    let unit = Unit::new(&line.unit);
    let left = planner.remove_explicit_inventory(
        &store.id,
        &IngredientRef::name(&line.ingredient),
        line.quantity,
        &unit,
    )?;
    report("stock.remove", &store.name, line, &unit, left);
    Ok(())
}

fn report(
    command: &str,
    store: &str,
    line: &StockLineArgs,
    unit: &Unit,
    stocked: rust_decimal::Decimal,
) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "store": store,
            "ingredient": line.ingredient,
            "unit": unit,
            "stocked": stocked,
        }));
        return;
    }
    output::success(&format!(
        "{} now holds {} {} {}",
        output::highlight(store),
        stocked,
        unit,
        line.ingredient
    ));
}

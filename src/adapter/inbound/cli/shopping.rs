//! Handler for `larder shopping-list`.

use serde_json::json;
use tabled::Tabled;

use super::command::SessionArg;
use super::output;
use crate::application::planner::MealPlanner;
use crate::domain::id::SessionId;
use crate::domain::shopping::ShoppingListEntry;
use crate::error::Result;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Ingredient")]
    ingredient: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Buy?")]
    likelihood: String,
    #[tabled(rename = "For")]
    recipes: String,
}

impl From<&ShoppingListEntry> for EntryRow {
    fn from(entry: &ShoppingListEntry) -> Self {
        Self {
            ingredient: entry.ingredient_name.clone(),
            quantity: format!("{} {}", entry.aggregated_quantity, entry.unit),
            likelihood: output::percent(entry.purchase_likelihood),
            recipes: entry.recipe_names.join(", "),
        }
    }
}

/// Execute `shopping-list`.
pub fn execute(planner: &MealPlanner, args: &SessionArg) -> Result<()> {
    let list = planner.shopping_list(&SessionId::new(&args.session));
    if output::is_json() {
        output::json_output(json!({
            "command": "shopping_list",
            "session": args.session,
            "list": list,
        }));
        return Ok(());
    }

    output::section("Grocery");
    output::table(
        list.grocery_items.iter().map(EntryRow::from).collect(),
        "(nothing to buy)",
    );
    output::section("Pantry staples");
    output::table(
        list.pantry_staples.iter().map(EntryRow::from).collect(),
        "(nothing to check)",
    );
    if !list.pantry_staples.is_empty() {
        output::hint("pantry staples are probably on hand; check before buying");
    }
    Ok(())
}

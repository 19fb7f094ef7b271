//! Handlers for `larder store`.

use serde_json::json;
use tabled::Tabled;

use super::command::{AddDefinitionArgs, AddExplicitArgs, DescribeArgs};
use super::{lookup_store, output};
use crate::application::planner::MealPlanner;
use crate::domain::store::{StoreKind, StoreRecord};
use crate::error::Result;

#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Holds")]
    holds: String,
    #[tabled(rename = "Id")]
    id: String,
}

impl From<&StoreRecord> for StoreRow {
    fn from(store: &StoreRecord) -> Self {
        let (kind, holds) = match &store.kind {
            StoreKind::Explicit { inventory } => {
                ("explicit".to_string(), format!("{} lines", inventory.items().len()))
            }
            StoreKind::Definition { kind, description } => {
                (kind.to_string(), description.clone())
            }
        };
        Self {
            name: store.name.clone(),
            kind,
            priority: store.priority,
            holds,
            id: store.id.to_string(),
        }
    }
}

/// Execute `store add-explicit`.
pub fn add_explicit(planner: &MealPlanner, args: &AddExplicitArgs) -> Result<()> {
    let store = planner.add_explicit_store(&args.name, args.priority)?;
    created(&store);
    Ok(())
}

/// Execute `store add-definition`.
pub fn add_definition(planner: &MealPlanner, args: &AddDefinitionArgs) -> Result<()> {
    let store = planner.add_definition_store(
        &args.name,
        args.priority,
        args.kind.into(),
        &args.description,
    )?;
    created(&store);
    Ok(())
}

/// Execute `store describe`.
pub fn describe(planner: &MealPlanner, args: &DescribeArgs) -> Result<()> {
    let store = lookup_store(planner, &args.store)?;
    let store = planner.set_store_description(&store.id, &args.description)?;
    if output::is_json() {
        output::json_output(json!({ "command": "store.describe", "store": store }));
        return Ok(());
    }
    output::success(&format!("Updated {}", output::highlight(&store.name)));
    Ok(())
}

/// Execute `store list`.
pub fn list(planner: &MealPlanner) -> Result<()> {
    let stores = planner.stores();
    if output::is_json() {
        output::json_output(json!({ "command": "store.list", "stores": stores }));
        return Ok(());
    }
    output::section("Stores");
    output::table(
        stores.iter().map(StoreRow::from).collect(),
        "(no stores yet)",
    );
    Ok(())
}

fn created(store: &StoreRecord) {
    if output::is_json() {
        output::json_output(json!({ "command": "store.add", "store": store }));
        return;
    }
    output::success(&format!("Created store {}", output::highlight(&store.name)));
    output::field("Id", &store.id);
    output::field("Priority", store.priority);
}

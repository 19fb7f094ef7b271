//! Shopping list aggregation.
//!
//! Always computed from the ledger at query time; claim state moves
//! underneath any cached copy.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::application::ledger::ClaimLedger;
use crate::application::recipe::RecipeBook;
use crate::application::registry::IngredientRegistry;
use crate::application::store::StoreCatalog;
use crate::domain::{
    claim::{Claim, ClaimSource},
    id::{IngredientId, RecipeId, SessionId},
    quantity::Unit,
    shopping::{ShoppingList, ShoppingListEntry},
    store::DefinitionKind,
};

/// Purchase likelihoods used when no presence confidence was inferred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodDefaults {
    pub grocery: f64,
    pub pantry: f64,
}

impl Default for LikelihoodDefaults {
    fn default() -> Self {
        Self {
            grocery: 1.0,
            pantry: 0.25,
        }
    }
}

impl LikelihoodDefaults {
    const fn for_kind(&self, kind: DefinitionKind) -> f64 {
        match kind {
            DefinitionKind::Grocery => self.grocery,
            DefinitionKind::Pantry => self.pantry,
        }
    }
}

/// Build the shopping list for `session`.
///
/// Only Reserved provisional claims of the session's unfinished recipes
/// count. Entries are grouped by view, ingredient and unit; quantities in
/// different units are never combined.
#[must_use]
pub fn build_shopping_list(
    session: &SessionId,
    recipes: &RecipeBook,
    ledger: &ClaimLedger,
    catalog: &StoreCatalog,
    registry: &IngredientRegistry,
    defaults: LikelihoodDefaults,
) -> ShoppingList {
    let open: HashMap<RecipeId, String> = recipes
        .in_session(session)
        .into_iter()
        .filter(|r| !r.is_terminal())
        .map(|r| (r.id, r.name))
        .collect();

    let mut groups: HashMap<(DefinitionKind, IngredientId, Unit), ShoppingListEntry> = HashMap::new();
    let mut seen: HashSet<(DefinitionKind, IngredientId, Unit, RecipeId)> = HashSet::new();

    for claim in ledger.reserved_claims() {
        let ClaimSource::Provisional { presence_confidence } = claim.source() else {
            continue;
        };
        let Some(recipe_name) = open.get(claim.recipe_id()) else {
            continue;
        };

        let kind = view_of(&claim, catalog);
        let likelihood = presence_confidence.map_or_else(|| defaults.for_kind(kind), |c| 1.0 - c);
        let key = (kind, claim.ingredient_id().clone(), claim.unit().clone());

        let entry = groups.entry(key.clone()).or_insert_with(|| ShoppingListEntry {
            ingredient_name: registry.display_name(claim.ingredient_id()),
            unit: claim.unit().clone(),
            aggregated_quantity: Decimal::ZERO,
            purchase_likelihood: likelihood,
            recipe_names: Vec::new(),
        });
        entry.aggregated_quantity += claim.quantity();
        entry.purchase_likelihood = entry.purchase_likelihood.max(likelihood);
        if seen.insert((key.0, key.1, key.2, claim.recipe_id().clone())) {
            entry.recipe_names.push(recipe_name.clone());
        }
    }

    let mut list = ShoppingList::default();
    for ((kind, _, _), entry) in groups {
        match kind {
            DefinitionKind::Grocery => list.grocery_items.push(entry),
            DefinitionKind::Pantry => list.pantry_staples.push(entry),
        }
    }
    list.grocery_items.sort_by(compare_entries);
    list.pantry_staples.sort_by(compare_entries);
    list
}

/// View a provisional claim belongs to. Unattributed remainders are grocery needs.
fn view_of(claim: &Claim, catalog: &StoreCatalog) -> DefinitionKind {
    claim
        .store_id()
        .and_then(|id| catalog.definition(id).ok())
        .map_or(DefinitionKind::Grocery, |store| store.kind())
}

fn compare_entries(a: &ShoppingListEntry, b: &ShoppingListEntry) -> Ordering {
    b.purchase_likelihood
        .total_cmp(&a.purchase_likelihood)
        .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
        .then_with(|| a.unit.cmp(&b.unit))
}

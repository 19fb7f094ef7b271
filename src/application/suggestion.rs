//! Availability snapshots and suggestion revalidation.
//!
//! Multi-wave pitch generation reads a point-in-time snapshot while other
//! recipes keep claiming. A suggestion records the coverage it assumed; it
//! must be revalidated before anyone fleshes it out.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::application::ledger::ClaimLedger;
use crate::application::registry::IngredientRegistry;
use crate::application::store::{InventorySource, StoreCatalog};
use crate::domain::{
    id::IngredientId,
    ingredient::Requirement,
    quantity::{Quantity, Unit},
    suggestion::{
        CoverageShortfall, InventoryLine, InventorySnapshot, RequirementCoverage, SuggestionBasis,
        SuggestionValidity,
    },
};
use crate::error::PlannerError;

/// Remaining explicit stock per `(store, ingredient, unit)` line.
#[must_use]
pub fn snapshot(
    catalog: &StoreCatalog,
    ledger: &ClaimLedger,
    registry: &IngredientRegistry,
) -> InventorySnapshot {
    let version = ledger.version();
    let mut lines = Vec::new();
    for store in catalog.explicit_stores() {
        let inventory = store.lock();
        for item in inventory.items() {
            let remaining = item.quantity
                - ledger.reserved_quantity(store.id(), &item.ingredient_id, &item.unit);
            if remaining <= Decimal::ZERO {
                continue;
            }
            lines.push(InventoryLine {
                store_id: store.id().clone(),
                store_name: store.name().to_string(),
                ingredient_id: item.ingredient_id.clone(),
                ingredient_name: registry.display_name(&item.ingredient_id),
                unit: item.unit.clone(),
                remaining,
            });
        }
    }
    InventorySnapshot { version, lines }
}

/// Record what explicit stock could cover for each requirement right now.
///
/// Requirements draw from one pool in order, so a repeated ingredient only
/// counts the stock left after the earlier lines. Nothing is registered:
/// names nobody has seen yet are recorded as uncovered.
///
/// # Errors
///
/// Returns [`PlannerError::UnknownIngredient`] for unknown ids and blank names.
pub fn pitch_basis(
    requirements: &[Requirement],
    catalog: &StoreCatalog,
    ledger: &ClaimLedger,
    registry: &IngredientRegistry,
) -> Result<SuggestionBasis, PlannerError> {
    let version = ledger.version();
    let mut pool = CoveragePool::new(catalog, ledger);
    let requirements = requirements
        .iter()
        .map(|requirement| {
            let (ingredient_id, ingredient_name) = match registry.lookup(&requirement.ingredient)? {
                Some(ingredient) => (Some(ingredient.id), ingredient.canonical_name),
                None => (None, registry.canonical(&requirement.ingredient.to_string())?),
            };
            Ok(RequirementCoverage {
                coverable: pool.take(ingredient_id.as_ref(), requirement.quantity, &requirement.unit),
                ingredient_id,
                ingredient_name,
                unit: requirement.unit.clone(),
                required: requirement.quantity,
            })
        })
        .collect::<Result<Vec<_>, PlannerError>>()?;
    Ok(SuggestionBasis {
        version,
        requirements,
    })
}

/// Check a pitched suggestion against current claims and stock.
#[must_use]
pub fn revalidate(
    basis: &SuggestionBasis,
    catalog: &StoreCatalog,
    ledger: &ClaimLedger,
) -> SuggestionValidity {
    if ledger.version() == basis.version {
        return SuggestionValidity::Current;
    }

    let mut pool = CoveragePool::new(catalog, ledger);
    let shortfalls: Vec<_> = basis
        .requirements
        .iter()
        .filter_map(|req| {
            let current = pool.take(req.ingredient_id.as_ref(), req.required, &req.unit);
            (current < req.coverable).then(|| CoverageShortfall {
                ingredient_name: req.ingredient_name.clone(),
                unit: req.unit.clone(),
                assumed: req.coverable,
                current,
            })
        })
        .collect();

    if shortfalls.is_empty() {
        SuggestionValidity::Current
    } else {
        debug!(
            pitched_at = basis.version,
            now = ledger.version(),
            shortfalls = shortfalls.len(),
            "Suggestion is stale"
        );
        SuggestionValidity::Stale { shortfalls }
    }
}

/// Unassigned explicit stock per `(ingredient, unit)`, handed out in
/// requirement order.
struct CoveragePool<'a> {
    catalog: &'a StoreCatalog,
    ledger: &'a ClaimLedger,
    left: HashMap<(IngredientId, Unit), Quantity>,
}

impl<'a> CoveragePool<'a> {
    fn new(catalog: &'a StoreCatalog, ledger: &'a ClaimLedger) -> Self {
        Self {
            catalog,
            ledger,
            left: HashMap::new(),
        }
    }

    fn take(&mut self, ingredient: Option<&IngredientId>, required: Quantity, unit: &Unit) -> Quantity {
        let Some(ingredient) = ingredient else {
            return Decimal::ZERO;
        };
        let (catalog, ledger) = (self.catalog, self.ledger);
        let left = self
            .left
            .entry((ingredient.clone(), unit.clone()))
            .or_insert_with(|| {
                catalog
                    .explicit_stores()
                    .iter()
                    .map(|store| store.remaining(ingredient, unit, ledger).max(Decimal::ZERO))
                    .sum()
            });
        let covered = (*left).min(required).max(Decimal::ZERO);
        *left -= covered;
        covered
    }
}

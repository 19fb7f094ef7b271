//! Planner state survives a restart through the SQLite journal.

mod support;

use rust_decimal_macros::dec;

use larder::adapter::outbound::inference::StaticInference;
use larder::domain::claim::{ClaimSource, ClaimState};
use larder::domain::id::SessionId;
use larder::domain::ingredient::IngredientRef;
use larder::domain::quantity::Unit;
use larder::domain::recipe::RecipeStatus;
use larder::domain::store::{DefinitionKind, StoreKind};
use larder::infrastructure::config::settings::Config;
use larder::infrastructure::factory::persistence::build_journal;

use support::{definition_store, planner_with_journal, recipe, stocked_store};

fn config_in(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.database = dir.path().join("larder.db").display().to_string();
    config
}

#[tokio::test]
async fn restart_restores_stock_claims_and_shopping_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let session = SessionId::new("week-1");

    let (freezer, chili, beef_claims) = {
        let planner = planner_with_journal(
            StaticInference::new().with_verdict("ground beef", 0.3, false),
            build_journal(&config).unwrap(),
        );
        let freezer = stocked_store(&planner, "Freezer", 10, "ground beef", dec!(2), "lb");
        definition_store(&planner, "Grocery", 1, DefinitionKind::Grocery, "general store");
        let chili = recipe(&planner, "week-1", "Chili");
        planner
            .propose_claim(&IngredientRef::name("ground beef"), dec!(3), &Unit::new("lb"), &chili)
            .await
            .unwrap();
        (freezer, chili.clone(), planner.claims_for_recipe(&chili))
    };

    let planner = planner_with_journal(StaticInference::new(), build_journal(&config).unwrap());
    planner.reload().unwrap();

    assert_eq!(planner.claims_for_recipe(&chili), beef_claims);
    assert_eq!(planner.recipe(&chili).unwrap().status, RecipeStatus::ClaimsReserved);
    assert_eq!(planner.stores().len(), 2);

    let list = planner.shopping_list(&session);
    assert_eq!(list.grocery_items.len(), 1);
    assert_eq!(list.grocery_items[0].aggregated_quantity, dec!(1));
    assert!((list.grocery_items[0].purchase_likelihood - 0.7).abs() < 1e-9);

    // Freezer stock is fully reserved after the restart too.
    let more = recipe(&planner, "week-1", "Burgers");
    let result = planner
        .propose_claim(&IngredientRef::name("ground beef"), dec!(1), &Unit::new("lb"), &more)
        .await
        .unwrap();
    assert!(result.claims().is_empty());
    assert!(planner.overcommitted_lines().is_empty());

    let settled = planner.consume_claims_for_recipe(&chili).unwrap();
    assert_eq!(settled.len(), 2);

    let reopened = planner_with_journal(StaticInference::new(), build_journal(&config).unwrap());
    reopened.reload().unwrap();
    let StoreKind::Explicit { inventory } = reopened.store(&freezer).unwrap().kind else {
        panic!("freezer is explicit");
    };
    assert!(inventory.items().is_empty() || inventory.items()[0].quantity == dec!(0));
    assert!(reopened
        .claims_for_recipe(&chili)
        .iter()
        .all(|c| c.state() == ClaimState::Consumed));
    assert_eq!(reopened.recipe(&chili).unwrap().status, RecipeStatus::Cooked);
}

#[tokio::test]
async fn provisional_source_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let chili = {
        let planner = planner_with_journal(
            StaticInference::new().with_verdict("cumin", 0.85, true),
            build_journal(&config).unwrap(),
        );
        definition_store(&planner, "Pantry", 1, DefinitionKind::Pantry, "spice rack");
        let chili = recipe(&planner, "s", "Chili");
        planner
            .propose_claim(&IngredientRef::name("cumin"), dec!(1.25), &Unit::new("tsp"), &chili)
            .await
            .unwrap();
        chili
    };

    let planner = planner_with_journal(StaticInference::new(), build_journal(&config).unwrap());
    planner.reload().unwrap();
    let claims = planner.claims_for_recipe(&chili);
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].quantity(), dec!(1.25));
    assert_eq!(
        claims[0].source(),
        ClaimSource::Provisional {
            presence_confidence: Some(0.85)
        }
    );
}

//! End-to-end planner behavior through the public facade.

mod support;

use rust_decimal_macros::dec;

use larder::adapter::outbound::inference::StaticInference;
use larder::domain::claim::{ClaimSource, ClaimState};
use larder::domain::id::{RecipeId, SessionId};
use larder::domain::ingredient::{IngredientRef, Requirement};
use larder::domain::outcome::{ClaimResult, RejectReason};
use larder::domain::quantity::Unit;
use larder::domain::store::{DefinitionKind, StoreKind};
use larder::domain::suggestion::SuggestionValidity;
use larder::error::PlannerError;

use support::{definition_store, planner, recipe, stocked_store};

fn lb() -> Unit {
    Unit::new("lb")
}

#[tokio::test]
async fn partial_when_freezer_runs_short() {
    let planner = planner(StaticInference::new());
    let freezer = stocked_store(&planner, "Freezer", 10, "ground beef", dec!(2), "lb");
    let grocery = definition_store(&planner, "Grocery", 1, DefinitionKind::Grocery, "general store");
    let chili = recipe(&planner, "week-1", "Chili");

    let result = planner
        .propose_claim(&IngredientRef::name("ground beef"), dec!(3), &lb(), &chili)
        .await
        .unwrap();

    let ClaimResult::Partial {
        claims,
        missing,
        shortfall,
    } = result
    else {
        panic!("expected partial, got {result:?}");
    };
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].quantity(), dec!(2));
    assert_eq!(claims[0].store_id(), Some(&freezer));
    assert_eq!(missing, dec!(1));
    assert_eq!(shortfall.store_id(), Some(&grocery));
    assert!(shortfall.source().is_provisional());
}

#[tokio::test]
async fn sequential_requests_compound_against_stock() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 5, "carrot", dec!(2), "lb");
    definition_store(&planner, "Grocery", 0, DefinitionKind::Grocery, "general store");
    let soup = recipe(&planner, "week-1", "Soup");

    let first = planner
        .propose_claim(&IngredientRef::name("carrot"), dec!(1.5), &lb(), &soup)
        .await
        .unwrap();
    assert!(first.is_accepted());
    assert_eq!(first.reserved_quantity(), dec!(1.5));

    let second = planner
        .propose_claim(&IngredientRef::name("carrot"), dec!(1.5), &lb(), &soup)
        .await
        .unwrap();
    assert!(second.is_partial());
    assert_eq!(second.reserved_quantity(), dec!(0.5));
    assert_eq!(second.missing(), dec!(1.0));
}

#[tokio::test]
async fn releasing_consumed_claim_fails() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Shelf", 1, "rice", dec!(4), "cup");
    let pilaf = recipe(&planner, "week-1", "Pilaf");

    let result = planner
        .propose_claim(&IngredientRef::name("rice"), dec!(1), &Unit::new("cup"), &pilaf)
        .await
        .unwrap();
    let claim = result.claims()[0].clone();
    planner.consume_claim(claim.id()).unwrap();

    let err = planner.release_claim(claim.id()).unwrap_err();
    assert!(matches!(
        err.as_planner(),
        Some(PlannerError::InvalidClaimTransition(_))
    ));
}

#[tokio::test]
async fn shopping_list_merges_needs_across_recipes() {
    let planner = planner(StaticInference::new().with_verdict("olive oil", 0.8, true));
    definition_store(&planner, "Pantry", 1, DefinitionKind::Pantry, "oils and spices");
    let salad = recipe(&planner, "week-1", "Salad");
    let pasta = recipe(&planner, "week-1", "Pasta");
    let tbsp = Unit::new("tbsp");

    for recipe in [&salad, &pasta] {
        planner
            .propose_claim(&IngredientRef::name("Olive Oil"), dec!(2), &tbsp, recipe)
            .await
            .unwrap();
    }

    let list = planner.shopping_list(&SessionId::new("week-1"));
    assert!(list.grocery_items.is_empty());
    assert_eq!(list.pantry_staples.len(), 1);
    let entry = &list.pantry_staples[0];
    assert_eq!(entry.ingredient_name, "olive oil");
    assert_eq!(entry.aggregated_quantity, dec!(4));
    assert_eq!(entry.recipe_names, vec!["Salad", "Pasta"]);
    assert!((entry.purchase_likelihood - 0.2).abs() < 1e-9);
}

#[tokio::test]
async fn consume_twice_decrements_stock_once() {
    let planner = planner(StaticInference::new());
    let shelf = stocked_store(&planner, "Shelf", 1, "flour", dec!(5), "cup");
    let bread = recipe(&planner, "week-1", "Bread");

    let result = planner
        .propose_claim(&IngredientRef::name("flour"), dec!(3), &Unit::new("cup"), &bread)
        .await
        .unwrap();
    let claim = result.claims()[0].clone();

    planner.consume_claim(claim.id()).unwrap();
    assert!(planner.consume_claim(claim.id()).is_err());

    let StoreKind::Explicit { inventory } = planner.store(&shelf).unwrap().kind else {
        panic!("shelf is explicit");
    };
    let flour = planner.ingredients()[0].id.clone();
    assert_eq!(inventory.stocked(&flour, &Unit::new("cup")), dec!(2));
}

#[tokio::test]
async fn release_then_repropose_reserves_freed_amount() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 1, "milk", dec!(1), "l");
    let first = recipe(&planner, "week-1", "Pancakes");
    let second = recipe(&planner, "week-1", "Custard");
    let litre = Unit::new("l");

    let held = planner
        .propose_claim(&IngredientRef::name("milk"), dec!(1), &litre, &first)
        .await
        .unwrap();
    planner.release_claim(held.claims()[0].id()).unwrap();

    let again = planner
        .propose_claim(&IngredientRef::name("milk"), dec!(1), &litre, &second)
        .await
        .unwrap();
    assert!(again.is_accepted());
}

#[tokio::test]
async fn identical_setups_split_identically() {
    async fn split() -> Vec<(String, String)> {
        let planner = planner(StaticInference::new());
        stocked_store(&planner, "Fridge", 5, "butter", dec!(1), "stick");
        stocked_store(&planner, "Freezer", 5, "butter", dec!(2), "stick");
        stocked_store(&planner, "Cellar", 9, "butter", dec!(1), "stick");
        let cake = recipe(&planner, "s", "Cake");
        let result = planner
            .propose_claim(&IngredientRef::name("butter"), dec!(3), &Unit::new("stick"), &cake)
            .await
            .unwrap();
        result
            .claims()
            .iter()
            .map(|c| {
                let store = planner.store(c.store_id().unwrap()).unwrap().name;
                (store, c.quantity().to_string())
            })
            .collect()
    }

    let expected = vec![
        ("Cellar".to_string(), "1".to_string()),
        ("Fridge".to_string(), "1".to_string()),
        ("Freezer".to_string(), "1".to_string()),
    ];
    assert_eq!(split().await, expected);
    assert_eq!(split().await, expected);
}

#[tokio::test]
async fn batch_processes_repeats_in_order() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Shelf", 1, "sugar", dec!(3), "cup");
    definition_store(&planner, "Grocery", 0, DefinitionKind::Grocery, "general store");
    let cake = recipe(&planner, "s", "Cake");
    let cup = "cup";

    let results = planner
        .propose_batch(
            &cake,
            &[
                Requirement::new("sugar", dec!(2), cup),
                Requirement::new("sugar", dec!(2), cup),
                Requirement::new("sugar", dec!(0), cup),
            ],
        )
        .await
        .unwrap();

    assert!(results[0].is_accepted());
    assert!(results[1].is_partial());
    assert_eq!(results[1].reserved_quantity(), dec!(1));
    assert!(matches!(
        results[2],
        ClaimResult::Rejected(RejectReason::InvalidQuantity { .. })
    ));
    assert!(planner.overcommitted_lines().is_empty());
}

#[tokio::test]
async fn batch_keeps_earlier_claims_when_later_fails() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Shelf", 1, "oats", dec!(2), "cup");
    let porridge = recipe(&planner, "s", "Porridge");

    let err = planner
        .propose_batch(
            &RecipeId::from("missing"),
            &[Requirement::new("oats", dec!(1), "cup")],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_planner(),
        Some(PlannerError::RecipeNotFound { .. })
    ));

    let results = planner
        .propose_batch(&porridge, &[Requirement::new("oats", dec!(1), "cup")])
        .await
        .unwrap();
    assert!(results[0].is_accepted());
    assert_eq!(planner.claims_for_recipe(&porridge).len(), 1);
}

#[tokio::test]
async fn cooking_consumes_and_blocks_new_claims() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 1, "egg", dec!(6), "each");
    let omelette = recipe(&planner, "s", "Omelette");
    let each = Unit::new("each");

    planner
        .propose_claim(&IngredientRef::name("egg"), dec!(3), &each, &omelette)
        .await
        .unwrap();
    let settled = planner.consume_claims_for_recipe(&omelette).unwrap();
    assert!(settled.iter().all(|c| c.state() == ClaimState::Consumed));

    let late = planner
        .propose_claim(&IngredientRef::name("egg"), dec!(1), &each, &omelette)
        .await
        .unwrap();
    assert!(matches!(
        late,
        ClaimResult::Rejected(RejectReason::RecipeFinalized { .. })
    ));
    assert!(planner.release_claims_for_recipe(&omelette).is_err());
}

#[tokio::test]
async fn abandoning_frees_stock_and_clears_shopping_list() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 1, "cream", dec!(1), "cup");
    definition_store(&planner, "Grocery", 0, DefinitionKind::Grocery, "general store");
    let sauce = recipe(&planner, "s", "Sauce");
    let cup = Unit::new("cup");

    planner
        .propose_claim(&IngredientRef::name("cream"), dec!(2), &cup, &sauce)
        .await
        .unwrap();
    assert_eq!(planner.shopping_list(&SessionId::new("s")).len(), 1);

    let released = planner.release_claims_for_recipe(&sauce).unwrap();
    assert_eq!(released.len(), 2);
    assert!(planner.shopping_list(&SessionId::new("s")).is_empty());
    assert_eq!(planner.snapshot().lines[0].remaining, dec!(1));
}

#[tokio::test]
async fn removing_reserved_stock_is_refused() {
    let planner = planner(StaticInference::new());
    let fridge = stocked_store(&planner, "Fridge", 1, "yogurt", dec!(2), "cup");
    let bowl = recipe(&planner, "s", "Bowl");
    let cup = Unit::new("cup");

    planner
        .propose_claim(&IngredientRef::name("yogurt"), dec!(1.5), &cup, &bowl)
        .await
        .unwrap();

    let err = planner
        .remove_explicit_inventory(&fridge, &IngredientRef::name("yogurt"), dec!(1), &cup)
        .unwrap_err();
    assert!(matches!(
        err.as_planner(),
        Some(PlannerError::StockReserved { .. })
    ));
    let left = planner
        .remove_explicit_inventory(&fridge, &IngredientRef::name("yogurt"), dec!(0.5), &cup)
        .unwrap();
    assert_eq!(left, dec!(1.5));
    assert!(planner.overcommitted_lines().is_empty());
}

#[tokio::test]
async fn stale_suggestion_is_reported() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 1, "tofu", dec!(1), "block");
    let stir_fry = recipe(&planner, "s", "Stir fry");

    let basis = planner
        .pitch_basis(&[Requirement::new("tofu", dec!(1), "block")])
        .unwrap();
    assert_eq!(planner.revalidate(&basis), SuggestionValidity::Current);

    planner
        .propose_claim(&IngredientRef::name("tofu"), dec!(1), &Unit::new("block"), &stir_fry)
        .await
        .unwrap();

    let SuggestionValidity::Stale { shortfalls } = planner.revalidate(&basis) else {
        panic!("suggestion should be stale");
    };
    assert_eq!(shortfalls[0].ingredient_name, "tofu");
    assert_eq!(shortfalls[0].current, dec!(0));
}

#[tokio::test]
async fn repeated_ingredient_basis_tracks_shared_stock() {
    let planner = planner(StaticInference::new());
    stocked_store(&planner, "Fridge", 1, "butter", dec!(3), "tbsp");
    let cake = recipe(&planner, "s", "Cake");

    let basis = planner
        .pitch_basis(&[
            Requirement::new("butter", dec!(2), "tbsp"),
            Requirement::new("butter", dec!(2), "tbsp"),
            Requirement::new("vanilla pod", dec!(1), "each"),
        ])
        .unwrap();
    let coverable: Vec<_> = basis.requirements.iter().map(|r| r.coverable).collect();
    assert_eq!(coverable, vec![dec!(2), dec!(1), dec!(0)]);
    assert_eq!(planner.ingredients().len(), 1);

    planner
        .propose_claim(&IngredientRef::name("butter"), dec!(1), &Unit::new("tbsp"), &cake)
        .await
        .unwrap();

    let SuggestionValidity::Stale { shortfalls } = planner.revalidate(&basis) else {
        panic!("suggestion should be stale");
    };
    assert_eq!(shortfalls.len(), 1);
    assert_eq!(shortfalls[0].assumed, dec!(1));
    assert_eq!(shortfalls[0].current, dec!(0));
}

#[tokio::test]
async fn no_definition_store_leaves_shortfall_unattributed() {
    let planner = planner(StaticInference::new());
    let tart = recipe(&planner, "s", "Tart");

    let result = planner
        .propose_claim(&IngredientRef::name("lemon"), dec!(2), &Unit::new("each"), &tart)
        .await
        .unwrap();
    let ClaimResult::Partial { shortfall, .. } = result else {
        panic!("expected partial");
    };
    assert_eq!(shortfall.store_id(), None);
    assert_eq!(
        shortfall.source(),
        ClaimSource::Provisional {
            presence_confidence: None
        }
    );
}

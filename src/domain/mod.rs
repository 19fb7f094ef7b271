//! Storage-agnostic domain types.
//!
//! Everything here is plain data plus the state machines that guard it.
//! Nothing in this module locks, logs or talks to a collaborator.

pub mod availability;
pub mod claim;
pub mod error;
pub mod id;
pub mod ingredient;
pub mod outcome;
pub mod quantity;
pub mod recipe;
pub mod shopping;
pub mod store;
pub mod suggestion;

pub use availability::{Availability, InferredPresence};
pub use claim::{Claim, ClaimParts, ClaimSource, ClaimState};
pub use error::DomainError;
pub use id::{ClaimId, IngredientId, RecipeId, SessionId, StoreId};
pub use ingredient::{Ingredient, IngredientRef, Requirement};
pub use outcome::{ClaimResult, RejectReason};
pub use quantity::{Quantity, Unit};
pub use recipe::{Recipe, RecipeStatus};
pub use shopping::{ShoppingList, ShoppingListEntry};
pub use store::{DefinitionKind, Inventory, StockItem, StoreKind, StoreRecord};
pub use suggestion::{
    CoverageShortfall, InventoryLine, InventorySnapshot, RequirementCoverage, SuggestionBasis,
    SuggestionValidity,
};

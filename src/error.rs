use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::{ClaimId, RecipeId, StoreId};
use crate::domain::quantity::{Quantity, Unit};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Allocation and bookkeeping errors raised by the planner core.
#[derive(Error, Debug, Clone)]
pub enum PlannerError {
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: Quantity },

    #[error("unknown ingredient: {ingredient}")]
    UnknownIngredient { ingredient: String },

    #[error("claim not found: {claim}")]
    ClaimNotFound { claim: ClaimId },

    #[error(transparent)]
    InvalidClaimTransition(DomainError),

    #[error(transparent)]
    InvalidRecipeTransition(DomainError),

    #[error("store not found: {store}")]
    StoreNotFound { store: StoreId },

    #[error("store {store} is not an {expected} store")]
    StoreKindMismatch {
        store: StoreId,
        expected: &'static str,
    },

    #[error("recipe not found: {recipe}")]
    RecipeNotFound { recipe: RecipeId },

    #[error("inference timed out after {timeout:?}")]
    InferenceTimeout { timeout: Duration },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("concurrent reservation conflict on store {store}: {reason}")]
    ConcurrentReservationConflict { store: StoreId, reason: String },

    #[error("cannot remove {requested} {unit} from store {store}: {reserved} is reserved")]
    StockReserved {
        store: StoreId,
        unit: Unit,
        requested: Quantity,
        reserved: Quantity,
    },

    #[error(transparent)]
    Domain(DomainError),
}

impl From<DomainError> for PlannerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidQuantity { quantity } => Self::InvalidQuantity { quantity },
            e @ DomainError::InvalidClaimTransition { .. } => Self::InvalidClaimTransition(e),
            e @ DomainError::InvalidRecipeTransition { .. } => Self::InvalidRecipeTransition(e),
            e => Self::Domain(e),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error::Planner(err.into())
    }
}

impl Error {
    /// The planner error inside, if this is one.
    #[must_use]
    pub const fn as_planner(&self) -> Option<&PlannerError> {
        match self {
            Error::Planner(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

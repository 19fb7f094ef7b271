//! Availability inference port.
//!
//! Definition-based stores have no tracked quantities, only a description
//! such as "well-stocked spice rack, flour, sugar, oils". Whether an
//! ingredient is likely there is delegated to an inference collaborator
//! through this port.
//!
//! Calls may be slow or fail. Callers bound them with a timeout and treat
//! every failure as unknown availability; implementations should not retry.

use async_trait::async_trait;

use crate::domain::availability::InferredPresence;
use crate::error::Result;

/// Infers whether an ingredient is present in a described store.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait AvailabilityInference: Send + Sync {
    /// Return the inference backend name for logging.
    fn name(&self) -> &'static str;

    /// Judge whether `ingredient` is likely present given `store_description`.
    ///
    /// # Arguments
    ///
    /// * `ingredient` - Canonical ingredient name (e.g., "olive oil").
    /// * `store_description` - Free-text description of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or answers with something that
    /// cannot be read as a verdict.
    async fn infer(&self, ingredient: &str, store_description: &str) -> Result<InferredPresence>;
}

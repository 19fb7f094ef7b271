//! Description-based store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{InventorySource, ReservationRequest};
use crate::application::ledger::ClaimLedger;
use crate::domain::{
    availability::{Availability, InferredPresence},
    claim::Claim,
    id::StoreId,
    ingredient::Ingredient,
    quantity::{Quantity, Unit},
    store::{DefinitionKind, StoreKind, StoreRecord},
};
use crate::error::PlannerError;
use crate::port::outbound::inference::AvailabilityInference;

/// Store known only through a natural-language description.
///
/// Availability comes from the inference collaborator, bounded by
/// `timeout`. A timeout or backend failure is reported as
/// [`Availability::Unknown`], never as present or absent.
pub struct DefinitionStore {
    id: StoreId,
    name: String,
    priority: i32,
    sequence: u64,
    kind: DefinitionKind,
    description: RwLock<String>,
    inference: Arc<dyn AvailabilityInference>,
    timeout: Duration,
}

impl DefinitionStore {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: StoreId,
        name: String,
        priority: i32,
        sequence: u64,
        kind: DefinitionKind,
        description: String,
        inference: Arc<dyn AvailabilityInference>,
        timeout: Duration,
    ) -> Self {
        Self {
            id,
            name,
            priority,
            sequence,
            kind,
            description: RwLock::new(description),
            inference,
            timeout,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DefinitionKind {
        self.kind
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.description.read().clone()
    }

    /// Replace the description used for inference.
    pub fn set_description(&self, description: impl Into<String>) {
        *self.description.write() = description.into();
    }

    /// Ask the inference collaborator, bounded by the store's timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InferenceTimeout`] when the call exceeds the
    /// timeout and [`PlannerError::Inference`] when the backend fails.
    pub async fn infer_presence(
        &self,
        ingredient: &Ingredient,
    ) -> Result<InferredPresence, PlannerError> {
        let description = self.description();
        let call = self
            .inference
            .infer(&ingredient.canonical_name, &description);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(presence)) => Ok(presence),
            Ok(Err(e)) => Err(PlannerError::Inference(e.to_string())),
            Err(_) => Err(PlannerError::InferenceTimeout {
                timeout: self.timeout,
            }),
        }
    }

    /// Like [`infer_presence`](Self::infer_presence), but logs failures and
    /// returns `None` for them.
    pub async fn assess(&self, ingredient: &Ingredient) -> Option<InferredPresence> {
        match self.infer_presence(ingredient).await {
            Ok(presence) => {
                debug!(
                    store = %self.name,
                    ingredient = %ingredient.canonical_name,
                    backend = self.inference.name(),
                    confidence = presence.confidence(),
                    likely_present = presence.likely_present(),
                    "Presence inferred"
                );
                Some(presence)
            }
            Err(e) => {
                warn!(
                    store = %self.name,
                    ingredient = %ingredient.canonical_name,
                    backend = self.inference.name(),
                    error = %e,
                    "Presence inference unavailable"
                );
                None
            }
        }
    }
}

#[async_trait]
impl InventorySource for DefinitionStore {
    fn id(&self) -> &StoreId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    async fn check_availability(
        &self,
        ingredient: &Ingredient,
        _quantity: Quantity,
        _unit: &Unit,
        _ledger: &ClaimLedger,
    ) -> Availability {
        match self.assess(ingredient).await {
            Some(presence) if presence.likely_present() => Availability::Available,
            Some(_) => Availability::Insufficient {
                available: Decimal::ZERO,
            },
            None => Availability::Unknown,
        }
    }

    fn attempt_reserve(
        &self,
        _request: ReservationRequest<'_>,
        _ledger: &ClaimLedger,
    ) -> Result<Option<Claim>, PlannerError> {
        Ok(None)
    }

    fn record(&self) -> StoreRecord {
        StoreRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            priority: self.priority,
            sequence: self.sequence,
            kind: StoreKind::Definition {
                kind: self.kind,
                description: self.description(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::inference::fixed::StaticInference;
    use crate::domain::id::RecipeId;
    use rust_decimal_macros::dec;

    fn make_store(inference: StaticInference, timeout: Duration) -> DefinitionStore {
        DefinitionStore::new(
            StoreId::from("pantry"),
            "Pantry".into(),
            2,
            1,
            DefinitionKind::Pantry,
            "oils, vinegars, spices".into(),
            Arc::new(inference),
            timeout,
        )
    }

    fn olive_oil() -> Ingredient {
        Ingredient::new("olive oil", Unit::new("tbsp"))
    }

    #[tokio::test]
    async fn likely_verdict_is_available() {
        let inference = StaticInference::new().with_verdict("olive oil", 0.9, true);
        let store = make_store(inference, Duration::from_secs(1));
        let ledger = ClaimLedger::new();

        let availability = store
            .check_availability(&olive_oil(), dec!(2), &Unit::new("tbsp"), &ledger)
            .await;
        assert_eq!(availability, Availability::Available);
    }

    #[tokio::test]
    async fn unlikely_verdict_is_insufficient() {
        let inference = StaticInference::new().with_verdict("olive oil", 0.8, false);
        let store = make_store(inference, Duration::from_secs(1));
        let ledger = ClaimLedger::new();

        let availability = store
            .check_availability(&olive_oil(), dec!(2), &Unit::new("tbsp"), &ledger)
            .await;
        assert_eq!(
            availability,
            Availability::Insufficient {
                available: dec!(0)
            }
        );
    }

    #[tokio::test]
    async fn backend_failure_is_unknown() {
        let store = make_store(StaticInference::new(), Duration::from_secs(1));
        let ledger = ClaimLedger::new();

        let availability = store
            .check_availability(&olive_oil(), dec!(2), &Unit::new("tbsp"), &ledger)
            .await;
        assert!(availability.is_unknown());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out_as_unknown() {
        let inference = StaticInference::new()
            .with_verdict("olive oil", 0.9, true)
            .with_delay(Duration::from_secs(10));
        let store = make_store(inference, Duration::from_millis(100));

        let err = store.infer_presence(&olive_oil()).await.unwrap_err();
        assert!(matches!(err, PlannerError::InferenceTimeout { .. }));

        let ledger = ClaimLedger::new();
        let availability = store
            .check_availability(&olive_oil(), dec!(2), &Unit::new("tbsp"), &ledger)
            .await;
        assert!(availability.is_unknown());
    }

    #[test]
    fn never_reserves() {
        let store = make_store(StaticInference::new(), Duration::from_secs(1));
        let ledger = ClaimLedger::new();
        let oil = olive_oil();
        let recipe = RecipeId::new();
        let unit = Unit::new("tbsp");

        let claim = store
            .attempt_reserve(
                ReservationRequest {
                    ingredient: &oil,
                    quantity: dec!(1),
                    unit: &unit,
                    recipe: &recipe,
                },
                &ledger,
            )
            .unwrap();
        assert!(claim.is_none());
        assert!(ledger.all().is_empty());
    }

    #[test]
    fn description_can_be_edited() {
        let store = make_store(StaticInference::new(), Duration::from_secs(1));
        store.set_description("baking shelf");
        assert_eq!(store.description(), "baking shelf");
        assert!(matches!(
            store.record().kind,
            StoreKind::Definition { ref description, .. } if description == "baking shelf"
        ));
    }
}

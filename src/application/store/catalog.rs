//! Ordered registry of stores.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;

use super::{visiting_order, DefinitionStore, ExplicitStore, InventorySource};
use crate::domain::{
    error::DomainError,
    id::StoreId,
    store::{DefinitionKind, Inventory, StoreKind, StoreRecord},
};
use crate::error::PlannerError;
use crate::port::outbound::inference::AvailabilityInference;

/// A store of either variant.
#[derive(Clone)]
pub enum Store {
    Explicit(Arc<ExplicitStore>),
    Definition(Arc<DefinitionStore>),
}

impl Store {
    /// The shared capability contract.
    #[must_use]
    pub fn source(&self) -> &dyn InventorySource {
        match self {
            Self::Explicit(store) => store.as_ref(),
            Self::Definition(store) => store.as_ref(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &StoreId {
        self.source().id()
    }

    #[must_use]
    pub fn record(&self) -> StoreRecord {
        self.source().record()
    }
}

/// Owns every store and yields them in visiting order:
/// priority descending, then creation order.
pub struct StoreCatalog {
    stores: RwLock<Vec<Store>>,
    next_sequence: AtomicU64,
    inference: Arc<dyn AvailabilityInference>,
    inference_timeout: Duration,
}

impl StoreCatalog {
    /// Create an empty catalog. Definition stores created through it use
    /// `inference`, bounded by `inference_timeout`.
    pub fn new(inference: Arc<dyn AvailabilityInference>, inference_timeout: Duration) -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
            next_sequence: AtomicU64::new(1),
            inference,
            inference_timeout,
        }
    }

    /// Create a quantity-tracked store.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank.
    pub fn add_explicit(
        &self,
        name: impl Into<String>,
        priority: i32,
    ) -> Result<Arc<ExplicitStore>, PlannerError> {
        let name = validate_name(name)?;
        let store = Arc::new(ExplicitStore::new(
            StoreId::new(),
            name,
            priority,
            self.next_sequence(),
            Inventory::new(),
        ));
        info!(store_id = %store.id(), name = %store.name(), priority, "Explicit store created");
        self.insert(Store::Explicit(Arc::clone(&store)));
        Ok(store)
    }

    /// Create a description-based store.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank.
    pub fn add_definition(
        &self,
        name: impl Into<String>,
        priority: i32,
        kind: DefinitionKind,
        description: impl Into<String>,
    ) -> Result<Arc<DefinitionStore>, PlannerError> {
        let name = validate_name(name)?;
        let store = Arc::new(self.build_definition(
            StoreId::new(),
            name,
            priority,
            self.next_sequence(),
            kind,
            description.into(),
        ));
        info!(
            store_id = %store.id(),
            name = %store.name(),
            priority,
            kind = %kind,
            "Definition store created"
        );
        self.insert(Store::Definition(Arc::clone(&store)));
        Ok(store)
    }

    /// Look up a store by id.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::StoreNotFound`] if no store has this id.
    pub fn get(&self, id: &StoreId) -> Result<Store, PlannerError> {
        self.stores
            .read()
            .iter()
            .find(|s| s.id() == id)
            .cloned()
            .ok_or_else(|| PlannerError::StoreNotFound { store: id.clone() })
    }

    /// Look up an explicit store by id.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::StoreNotFound`] or, for definition stores,
    /// [`PlannerError::StoreKindMismatch`].
    pub fn explicit(&self, id: &StoreId) -> Result<Arc<ExplicitStore>, PlannerError> {
        match self.get(id)? {
            Store::Explicit(store) => Ok(store),
            Store::Definition(_) => Err(PlannerError::StoreKindMismatch {
                store: id.clone(),
                expected: "explicit",
            }),
        }
    }

    /// Look up a definition store by id.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::StoreNotFound`] or, for explicit stores,
    /// [`PlannerError::StoreKindMismatch`].
    pub fn definition(&self, id: &StoreId) -> Result<Arc<DefinitionStore>, PlannerError> {
        match self.get(id)? {
            Store::Definition(store) => Ok(store),
            Store::Explicit(_) => Err(PlannerError::StoreKindMismatch {
                store: id.clone(),
                expected: "definition",
            }),
        }
    }

    /// All stores in visiting order.
    #[must_use]
    pub fn ordered(&self) -> Vec<Store> {
        self.stores.read().clone()
    }

    /// Explicit stores in visiting order.
    #[must_use]
    pub fn explicit_stores(&self) -> Vec<Arc<ExplicitStore>> {
        self.stores
            .read()
            .iter()
            .filter_map(|s| match s {
                Store::Explicit(store) => Some(Arc::clone(store)),
                Store::Definition(_) => None,
            })
            .collect()
    }

    /// Definition stores in visiting order.
    #[must_use]
    pub fn definition_stores(&self) -> Vec<Arc<DefinitionStore>> {
        self.stores
            .read()
            .iter()
            .filter_map(|s| match s {
                Store::Definition(store) => Some(Arc::clone(store)),
                Store::Explicit(_) => None,
            })
            .collect()
    }

    /// The lowest-priority definition store; unmet remainders fall back to it.
    #[must_use]
    pub fn catch_all(&self) -> Option<Arc<DefinitionStore>> {
        self.definition_stores().pop()
    }

    /// Store records in creation order.
    #[must_use]
    pub fn records(&self) -> Vec<StoreRecord> {
        let mut records: Vec<_> = self.stores.read().iter().map(Store::record).collect();
        records.sort_by_key(|r| r.sequence);
        records
    }

    /// Replace the catalog contents with persisted stores.
    pub fn restore(&self, records: Vec<StoreRecord>) {
        let max_sequence = records.iter().map(|r| r.sequence).max().unwrap_or(0);
        let mut restored: Vec<Store> = records
            .into_iter()
            .map(|record| match record.kind {
                StoreKind::Explicit { inventory } => Store::Explicit(Arc::new(
                    ExplicitStore::new(record.id, record.name, record.priority, record.sequence, inventory),
                )),
                StoreKind::Definition { kind, description } => {
                    Store::Definition(Arc::new(self.build_definition(
                        record.id,
                        record.name,
                        record.priority,
                        record.sequence,
                        kind,
                        description,
                    )))
                }
            })
            .collect();
        restored.sort_by_key(|s| visiting_order(s.source()));
        *self.stores.write() = restored;
        self.next_sequence.store(max_sequence + 1, Ordering::SeqCst);
    }

    fn build_definition(
        &self,
        id: StoreId,
        name: String,
        priority: i32,
        sequence: u64,
        kind: DefinitionKind,
        description: String,
    ) -> DefinitionStore {
        DefinitionStore::new(
            id,
            name,
            priority,
            sequence,
            kind,
            description,
            Arc::clone(&self.inference),
            self.inference_timeout,
        )
    }

    fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst)
    }

    fn insert(&self, store: Store) {
        let mut stores = self.stores.write();
        stores.push(store);
        stores.sort_by_key(|s| visiting_order(s.source()));
    }
}

fn validate_name(name: impl Into<String>) -> Result<String, PlannerError> {
    let name = name.into().trim().to_string();
    if name.is_empty() {
        return Err(DomainError::EmptyName {
            field: "store name",
        }
        .into());
    }
    Ok(name)
}

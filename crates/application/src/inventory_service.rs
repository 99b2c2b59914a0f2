use std::sync::Arc;

use depot_core::{AppError, AppResult, EntityId};
use depot_domain::{
    EntityKind, EntityRecord, EntitySchema, FieldValue, PayloadMode, SchemaCatalog,
    validate_payload,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    CompiledUpdate, EntityStore, Operation, ReferenceGate, Reply, UniquenessArbiter,
    apply_partial_update,
};

mod read;
mod write;

/// Application service for create, read, partial update and delete of managed entities.
///
/// Every request runs its own validation and storage round-trips; nothing is
/// cached between requests.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn EntityStore>,
    catalog: Arc<SchemaCatalog>,
    uniqueness: UniquenessArbiter,
    references: ReferenceGate,
}

impl InventoryService {
    /// Creates a new inventory service from a store implementation and schema catalog.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            uniqueness: UniquenessArbiter::new(store.clone()),
            references: ReferenceGate::new(store.clone(), catalog.clone()),
            store,
            catalog,
        }
    }

    /// Returns the schema catalog the service validates against.
    #[must_use]
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    fn schema(&self, kind: EntityKind) -> AppResult<&EntitySchema> {
        self.catalog.schema(kind)
    }

    async fn require_existing(
        &self,
        schema: &EntitySchema,
        id: EntityId,
    ) -> AppResult<EntityRecord> {
        self.store.get(schema, id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "{} '{}' does not exist",
                schema.kind().as_str(),
                id
            ))
        })
    }
}

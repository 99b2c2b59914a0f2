use async_trait::async_trait;
use depot_core::{AppResult, EntityId};
use depot_domain::{EntityKind, EntityRecord, EntitySchema, FieldValue, ValidatedFields};

use crate::CompiledUpdate;

/// Repository port for entity persistence.
///
/// The store is the sole source of truth; callers never cache records
/// across requests.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Inserts a new entity and returns it with its assigned identifier.
    async fn create(
        &self,
        schema: &EntitySchema,
        fields: &ValidatedFields,
    ) -> AppResult<EntityRecord>;

    /// Looks up a single entity by identifier.
    async fn get(&self, schema: &EntitySchema, id: EntityId) -> AppResult<Option<EntityRecord>>;

    /// Lists every entity of the schema's kind ordered by identifier.
    async fn list(&self, schema: &EntitySchema) -> AppResult<Vec<EntityRecord>>;

    /// Hard-deletes an entity and returns whether a row was removed.
    async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<bool>;

    /// Executes a compiled partial update and returns the affected row count.
    async fn raw_update(&self, update: &CompiledUpdate) -> AppResult<u64>;

    /// Returns whether an entity other than `excluding` stores `value` in `field_name`.
    ///
    /// The default implementation scans [`EntityStore::list`]; stores that
    /// can answer with an indexed existence query should override it.
    async fn value_in_use(
        &self,
        schema: &EntitySchema,
        field_name: &str,
        value: &FieldValue,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        let records = self.list(schema).await?;

        Ok(records.iter().any(|record| {
            Some(record.id()) != excluding && record.field(field_name) == Some(value)
        }))
    }
}

use super::*;

impl InventoryService {
    /// Returns a single entity by identifier.
    pub async fn get(&self, kind: EntityKind, id: EntityId) -> AppResult<EntityRecord> {
        let schema = self.schema(kind)?;
        self.require_existing(schema, id).await
    }

    /// Lists every entity of a kind ordered by identifier.
    pub async fn list(&self, kind: EntityKind) -> AppResult<Vec<EntityRecord>> {
        let schema = self.schema(kind)?;
        self.store.list(schema).await
    }

    /// Reads a single entity and maps the outcome for the boundary layer.
    pub async fn get_reply(&self, kind: EntityKind, id: EntityId) -> Reply<EntityRecord> {
        Reply::from_outcome(Operation::Read, self.get(kind, id).await)
    }

    /// Lists entities and maps the outcome for the boundary layer.
    pub async fn list_reply(&self, kind: EntityKind) -> Reply<Vec<EntityRecord>> {
        Reply::from_outcome(Operation::Read, self.list(kind).await)
    }
}

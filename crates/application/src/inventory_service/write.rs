use super::*;

impl InventoryService {
    /// Creates an entity after validation, reference and uniqueness checks.
    pub async fn create(&self, kind: EntityKind, payload: Value) -> AppResult<EntityRecord> {
        let schema = self.schema(kind)?;
        let fields = validate_payload(schema, &payload, PayloadMode::Create)?;
        debug!(entity = kind.as_str(), fields = fields.len(), "create payload validated");

        self.references
            .check_references(schema.dependencies(), &fields)
            .await?;
        self.uniqueness.check_fields(schema, &fields, None).await?;

        let record = self.store.create(schema, &fields).await?;
        info!(entity = kind.as_str(), id = %record.id(), "entity created");

        Ok(record)
    }

    /// Applies a partial update and returns the re-read entity.
    ///
    /// Fields absent from `payload` keep their stored values. Dependency
    /// fields present in `payload` must resolve, as on create.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        payload: Value,
    ) -> AppResult<EntityRecord> {
        let schema = self.schema(kind)?;
        let fields = validate_payload(schema, &payload, PayloadMode::Update)?;
        debug!(entity = kind.as_str(), id = %id, fields = fields.len(), "update payload validated");

        self.require_existing(schema, id).await?;
        self.references
            .check_references(schema.dependencies(), &fields)
            .await?;
        self.uniqueness
            .check_fields(schema, &fields, Some(id))
            .await?;

        let update = CompiledUpdate::compile(schema, id, &fields)?;
        let record = apply_partial_update(self.store.as_ref(), schema, &update).await?;
        info!(entity = kind.as_str(), id = %id, columns = ?update.columns(), "entity updated");

        Ok(record)
    }

    /// Hard-deletes an entity that no dependent record still references.
    pub async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<()> {
        let schema = self.schema(kind)?;
        self.require_existing(schema, id).await?;

        let reference = FieldValue::Integer(id.as_i64());
        for (dependent, dependency) in self.catalog.referencing(kind) {
            if self
                .store
                .value_in_use(dependent, dependency.field_name(), &reference, None)
                .await?
            {
                return Err(AppError::Conflict(format!(
                    "{} '{}' cannot be deleted because it is still referenced by {}.{}",
                    kind.as_str(),
                    id,
                    dependent.kind().as_str(),
                    dependency.field_name()
                )));
            }
        }

        if !self.store.delete(kind, id).await? {
            return Err(AppError::NotFound(format!(
                "{} '{}' does not exist",
                kind.as_str(),
                id
            )));
        }

        info!(entity = kind.as_str(), id = %id, "entity deleted");
        Ok(())
    }

    /// Creates an entity and maps the outcome for the boundary layer.
    pub async fn create_reply(&self, kind: EntityKind, payload: Value) -> Reply<EntityRecord> {
        Reply::from_outcome(Operation::Create, self.create(kind, payload).await)
    }

    /// Partially updates an entity and maps the outcome for the boundary layer.
    pub async fn update_reply(
        &self,
        kind: EntityKind,
        id: EntityId,
        payload: Value,
    ) -> Reply<EntityRecord> {
        Reply::from_outcome(Operation::Update, self.update(kind, id, payload).await)
    }

    /// Deletes an entity and maps the outcome for the boundary layer.
    pub async fn delete_reply(&self, kind: EntityKind, id: EntityId) -> Reply<()> {
        Reply::from_outcome(Operation::Delete, self.delete(kind, id).await)
    }
}

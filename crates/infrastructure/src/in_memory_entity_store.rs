use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use depot_application::{CompiledUpdate, EntityStore};
use depot_core::{AppError, AppResult, EntityId};
use depot_domain::{
    EntityKind, EntityRecord, EntitySchema, FieldValue, SchemaCatalog, ValidatedFields,
};
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// In-memory entity store implementation.
///
/// Mirrors the relational constraints of the Postgres store: business keys
/// are unique per kind, dependency fields must name existing rows, and
/// referenced rows cannot be deleted.
#[derive(Debug)]
pub struct InMemoryEntityStore {
    catalog: Arc<SchemaCatalog>,
    tables: RwLock<HashMap<EntityKind, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    sequence: i64,
    rows: BTreeMap<i64, EntityRecord>,
}

impl InMemoryEntityStore {
    /// Creates an empty store for the entities of `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            catalog,
            tables: RwLock::new(HashMap::new()),
        }
    }
}

fn conflicting_business_key<'a>(
    schema: &'a EntitySchema,
    table: &Table,
    fields: &BTreeMap<String, FieldValue>,
    excluding: Option<i64>,
) -> Option<(&'a str, String)> {
    schema.business_keys().find_map(|key| {
        let value = fields.get(key.name())?;
        table
            .rows
            .iter()
            .any(|(id, record)| Some(*id) != excluding && record.field(key.name()) == Some(value))
            .then(|| (key.name(), value.to_string()))
    })
}

fn dangling_reference(
    schema: &EntitySchema,
    tables: &HashMap<EntityKind, Table>,
    fields: &BTreeMap<String, FieldValue>,
) -> Option<AppError> {
    schema.dependencies().iter().find_map(|dependency| {
        let id = fields.get(dependency.field_name())?.as_integer()?;
        let resolved = tables
            .get(&dependency.referenced())
            .is_some_and(|table| table.rows.contains_key(&id));

        (!resolved).then(|| AppError::MissingReference {
            field: dependency.field_name().to_owned(),
            entity: dependency.referenced().as_str().to_owned(),
            id: EntityId::new(id),
        })
    })
}

fn unique_violation(schema: &EntitySchema, field_name: &str, value: &str) -> AppError {
    AppError::Conflict(format!(
        "{} with {} '{}' already exists",
        schema.kind().as_str(),
        field_name,
        value
    ))
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn create(
        &self,
        schema: &EntitySchema,
        fields: &ValidatedFields,
    ) -> AppResult<EntityRecord> {
        let values: BTreeMap<String, FieldValue> = fields
            .iter()
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect();

        let mut tables = self.tables.write().await;
        if let Some(error) = dangling_reference(schema, &tables, &values) {
            return Err(error);
        }
        let table = tables.entry(schema.kind()).or_default();

        if let Some((field_name, value)) = conflicting_business_key(schema, table, &values, None) {
            return Err(unique_violation(schema, field_name, &value));
        }

        table.sequence += 1;
        let id = table.sequence;
        let record = EntityRecord::new(EntityId::new(id), schema.kind(), values);
        table.rows.insert(id, record.clone());

        Ok(record)
    }

    async fn get(&self, schema: &EntitySchema, id: EntityId) -> AppResult<Option<EntityRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .get(&schema.kind())
            .and_then(|table| table.rows.get(&id.as_i64()).cloned()))
    }

    async fn list(&self, schema: &EntitySchema) -> AppResult<Vec<EntityRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .get(&schema.kind())
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let reference = FieldValue::Integer(id.as_i64());

        for (dependent, dependency) in self.catalog.referencing(kind) {
            let referenced = tables.get(&dependent.kind()).is_some_and(|table| {
                table
                    .rows
                    .values()
                    .any(|record| record.field(dependency.field_name()) == Some(&reference))
            });
            if referenced {
                return Err(AppError::Conflict(format!(
                    "{} '{}' is still referenced by {}.{}",
                    kind.as_str(),
                    id,
                    dependent.kind().as_str(),
                    dependency.field_name()
                )));
            }
        }

        Ok(tables
            .get_mut(&kind)
            .and_then(|table| table.rows.remove(&id.as_i64()))
            .is_some())
    }

    async fn raw_update(&self, update: &CompiledUpdate) -> AppResult<u64> {
        let schema = self.catalog.schema(update.kind())?;
        let key = update.id().as_i64();
        let mut tables = self.tables.write().await;

        let Some(existing) = tables
            .get(&update.kind())
            .and_then(|table| table.rows.get(&key))
        else {
            return Ok(0);
        };

        let mut fields = existing.fields().clone();
        for (column, value) in update.assignments() {
            fields.insert(column.to_owned(), value.clone());
        }

        if let Some(error) = dangling_reference(schema, &tables, &fields) {
            return Err(error);
        }

        let table = tables.entry(update.kind()).or_default();
        if let Some((field_name, value)) =
            conflicting_business_key(schema, table, &fields, Some(key))
        {
            return Err(unique_violation(schema, field_name, &value));
        }

        table.rows.insert(key, EntityRecord::new(update.id(), update.kind(), fields));

        Ok(1)
    }
}

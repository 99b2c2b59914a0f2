//! Partial update compilation and the write-then-reread apply step.
//!
//! This is the only place UPDATE statement text is produced. Column
//! identifiers come from the entity schema, never from payload keys, and
//! every value travels as a positional parameter.

use depot_core::{AppError, AppResult, EntityId};
use depot_domain::{EntityKind, EntityRecord, EntitySchema, FieldValue, ValidatedFields};
use tracing::warn;

use crate::EntityStore;

/// Parameterized update restricted to the fields present in a request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledUpdate {
    kind: EntityKind,
    id: EntityId,
    columns: Vec<String>,
    values: Vec<FieldValue>,
    statement: String,
}

impl CompiledUpdate {
    /// Compiles validated fields into a deterministic update statement.
    ///
    /// Parameters `$1..$n` carry the values in schema declaration order and
    /// `$n+1` carries the entity identifier.
    pub fn compile(
        schema: &EntitySchema,
        id: EntityId,
        fields: &ValidatedFields,
    ) -> AppResult<Self> {
        if fields.kind() != schema.kind() {
            return Err(AppError::Internal(format!(
                "fields validated for '{}' cannot update '{}'",
                fields.kind().as_str(),
                schema.kind().as_str()
            )));
        }

        if fields.is_empty() {
            return Err(AppError::EmptyPayload);
        }

        let mut columns = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        for (name, value) in fields.iter() {
            let field = schema.field(name).ok_or_else(|| AppError::UnknownField {
                entity: schema.kind().as_str().to_owned(),
                field: name.to_owned(),
            })?;
            columns.push(field.name().to_owned());
            values.push(value.clone());
        }

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{} = ${}", quote_identifier(column), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let statement = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            quote_identifier(schema.kind().table_name()),
            assignments,
            quote_identifier("id"),
            columns.len() + 1
        );

        Ok(Self {
            kind: schema.kind(),
            id,
            columns,
            values,
            statement,
        })
    }

    /// Returns the entity kind being updated.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the identifier bound to the last positional parameter.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the updated columns in parameter order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the positional values in parameter order.
    #[must_use]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Returns `(column, value)` pairs in parameter order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Returns the parameterized SQL statement.
    #[must_use]
    pub fn statement(&self) -> &str {
        self.statement.as_str()
    }
}

/// Quotes a SQL identifier, doubling embedded quotes.
#[must_use]
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Commits a compiled update and re-reads the entity from storage.
///
/// A write that fails or touches no row is `StorageWriteFailed`; a write that
/// applied but cannot be re-read is `PostWriteReadFailed`. Neither is retried.
/// Constraint rejections reported by the store (`Conflict`, `NotFound` or
/// `MissingReference`) pass through unchanged.
pub async fn apply_partial_update(
    store: &dyn EntityStore,
    schema: &EntitySchema,
    update: &CompiledUpdate,
) -> AppResult<EntityRecord> {
    let kind = update.kind().as_str();
    let id = update.id();

    let affected = match store.raw_update(update).await {
        Ok(affected) => affected,
        Err(
            error @ (AppError::Conflict(_)
            | AppError::NotFound(_)
            | AppError::MissingReference { .. }),
        ) => return Err(error),
        Err(error) => {
            warn!(error = %error, entity = kind, id = %id, "partial update write failed");
            return Err(AppError::StorageWriteFailed(format!(
                "failed to update {kind} '{id}': {error}"
            )));
        }
    };

    if affected == 0 {
        warn!(entity = kind, id = %id, "partial update touched no rows");
        return Err(AppError::StorageWriteFailed(format!(
            "{kind} '{id}' did not exist at write time"
        )));
    }

    match store.get(schema, id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            warn!(entity = kind, id = %id, "entity vanished after partial update");
            Err(AppError::PostWriteReadFailed(format!(
                "{kind} '{id}' was not found after update"
            )))
        }
        Err(error) => {
            warn!(error = %error, entity = kind, id = %id, "re-read after partial update failed");
            Err(AppError::PostWriteReadFailed(format!(
                "failed to reload {kind} '{id}' after update: {error}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use depot_core::{AppError, EntityId};
    use depot_domain::{EntityKind, PayloadMode, SchemaCatalog, validate_payload};
    use serde_json::json;

    use super::CompiledUpdate;

    #[test]
    fn compiles_only_present_fields_in_schema_order() {
        let catalog = SchemaCatalog::standard().unwrap_or_else(|_| unreachable!());
        let schema = catalog
            .schema(EntityKind::Warehouse)
            .unwrap_or_else(|_| unreachable!());
        let fields = validate_payload(
            schema,
            &json!({"telephone": "555-0100", "warehouse_code": "W2"}),
            PayloadMode::Update,
        )
        .unwrap_or_else(|error| panic!("validation failed: {error}"));

        let update = CompiledUpdate::compile(schema, EntityId::new(9), &fields)
            .unwrap_or_else(|error| panic!("compile failed: {error}"));

        assert_eq!(
            update.statement(),
            r#"UPDATE "warehouses" SET "warehouse_code" = $1, "telephone" = $2 WHERE "id" = $3"#
        );
        assert_eq!(update.columns(), ["warehouse_code", "telephone"]);
        assert_eq!(update.values().len(), 2);
        assert_eq!(update.id(), EntityId::new(9));
    }

    #[test]
    fn rejects_fields_validated_for_another_kind() {
        let catalog = SchemaCatalog::standard().unwrap_or_else(|_| unreachable!());
        let buyer = catalog
            .schema(EntityKind::Buyer)
            .unwrap_or_else(|_| unreachable!());
        let employee = catalog
            .schema(EntityKind::Employee)
            .unwrap_or_else(|_| unreachable!());
        let fields = validate_payload(buyer, &json!({"first_name": "Ada"}), PayloadMode::Update)
            .unwrap_or_else(|error| panic!("validation failed: {error}"));

        let result = CompiledUpdate::compile(employee, EntityId::new(1), &fields);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn quotes_embedded_quotes_in_identifiers() {
        assert_eq!(super::quote_identifier(r#"we"ird"#), r#""we""ird""#);
    }
}

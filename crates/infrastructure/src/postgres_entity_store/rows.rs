use super::*;

use std::collections::BTreeMap;

use sqlx::query_builder::Separated;

pub(super) fn push_bind_value(
    values: &mut Separated<'_, '_, Postgres, &'static str>,
    value: &FieldValue,
) {
    match value {
        FieldValue::Text(text) => {
            values.push_bind(text.clone());
        }
        FieldValue::Integer(integer) => {
            values.push_bind(*integer);
        }
        FieldValue::Float(float) => {
            values.push_bind(*float);
        }
        FieldValue::Date(date) => {
            values.push_bind(*date);
        }
    }
}

pub(super) fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FieldValue::Text(text) => query.bind(text.clone()),
        FieldValue::Integer(integer) => query.bind(*integer),
        FieldValue::Float(float) => query.bind(*float),
        FieldValue::Date(date) => query.bind(*date),
    }
}

/// Decodes a row using the column set declared by the schema.
///
/// NULL columns are omitted from the record.
pub(super) fn record_from_row(schema: &EntitySchema, row: &PgRow) -> AppResult<EntityRecord> {
    let decode_error = |column: &str, error: sqlx::Error| {
        AppError::Internal(format!(
            "failed to decode {}.{}: {error}",
            schema.kind().table_name(),
            column
        ))
    };

    let id = row
        .try_get::<i64, _>("id")
        .map_err(|error| decode_error("id", error))?;

    let mut fields = BTreeMap::new();
    for field in schema.fields() {
        let name = field.name();
        let value = match field.kind() {
            FieldKind::Text => row
                .try_get::<Option<String>, _>(name)
                .map(|value| value.map(FieldValue::Text)),
            FieldKind::Integer => row
                .try_get::<Option<i64>, _>(name)
                .map(|value| value.map(FieldValue::Integer)),
            FieldKind::Float => row
                .try_get::<Option<f64>, _>(name)
                .map(|value| value.map(FieldValue::Float)),
            FieldKind::Date => row
                .try_get::<Option<NaiveDate>, _>(name)
                .map(|value| value.map(FieldValue::Date)),
        }
        .map_err(|error| decode_error(name, error))?;

        if let Some(value) = value {
            fields.insert(name.to_owned(), value);
        }
    }

    Ok(EntityRecord::new(EntityId::new(id), schema.kind(), fields))
}

/// Statement whose constraint violation is being translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Write {
    Insert,
    Update,
    Delete,
}

/// Maps unique (`23505`) and foreign key (`23503`) violations.
///
/// A foreign key violation on delete means the row is still referenced and
/// is a conflict; on insert or update it means a dependency does not exist.
pub(super) fn constraint_violation(
    error: &sqlx::Error,
    kind: EntityKind,
    write: Write,
) -> Option<AppError> {
    let sqlx::Error::Database(database_error) = error else {
        return None;
    };
    let constraint = database_error.constraint().unwrap_or("unnamed constraint");

    match (database_error.code().as_deref(), write) {
        (Some("23505"), _) => Some(AppError::Conflict(format!(
            "{} already exists with the same value for {constraint}",
            kind.as_str()
        ))),
        (Some("23503"), Write::Delete) => Some(AppError::Conflict(format!(
            "{} is still referenced through {constraint}",
            kind.as_str()
        ))),
        (Some("23503"), Write::Insert | Write::Update) => Some(AppError::NotFound(format!(
            "{} references a missing entity through {constraint}",
            kind.as_str()
        ))),
        _ => None,
    }
}

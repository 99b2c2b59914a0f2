use std::collections::HashMap;

use depot_core::{AppError, AppResult};
use serde_json::Value;

use crate::{EntityKind, EntitySchema, FieldValue};

/// Distinguishes create payloads from partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Every required field must be present.
    Create,
    /// Only the present fields are validated.
    Update,
}

/// Typed attribute subset accepted by an entity schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    kind: EntityKind,
    values: Vec<(String, FieldValue)>,
}

impl ValidatedFields {
    /// Returns the entity kind the values were validated against.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns a single validated value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Iterates over values in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Returns the number of validated values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no value was validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the set and returns values in schema declaration order.
    #[must_use]
    pub fn into_values(self) -> Vec<(String, FieldValue)> {
        self.values
    }
}

/// Validates and coerces a loosely typed payload against an entity schema.
///
/// Keys are visited in the payload map's iteration order and the first violation is
/// returned. The result is ordered by schema declaration order so that
/// downstream statement building is deterministic.
pub fn validate_payload(
    schema: &EntitySchema,
    raw: &Value,
    mode: PayloadMode,
) -> AppResult<ValidatedFields> {
    let object = raw.as_object().ok_or_else(|| {
        AppError::Validation(format!(
            "payload for entity '{}' must be a JSON object",
            schema.kind().as_str()
        ))
    })?;

    if object.is_empty() {
        return Err(AppError::EmptyPayload);
    }

    let mut coerced = HashMap::with_capacity(object.len());
    for (key, value) in object {
        let field = schema
            .field(key.as_str())
            .ok_or_else(|| AppError::UnknownField {
                entity: schema.kind().as_str().to_owned(),
                field: key.clone(),
            })?;
        coerced.insert(field.name(), field.coerce(value)?);
    }

    if mode == PayloadMode::Create
        && let Some(missing) = schema
            .fields()
            .iter()
            .find(|field| field.is_required() && !coerced.contains_key(field.name()))
    {
        return Err(AppError::MissingRequiredField {
            field: missing.name().to_owned(),
        });
    }

    let values = schema
        .fields()
        .iter()
        .filter_map(|field| {
            coerced
                .remove(field.name())
                .map(|value| (field.name().to_owned(), value))
        })
        .collect();

    Ok(ValidatedFields {
        kind: schema.kind(),
        values,
    })
}

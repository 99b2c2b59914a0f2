use std::collections::BTreeMap;

use depot_core::EntityId;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::{EntityKind, FieldValue};

/// Persisted entity as returned by storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    id: EntityId,
    kind: EntityKind,
    fields: BTreeMap<String, FieldValue>,
}

impl EntityRecord {
    /// Creates a record projection.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, fields: BTreeMap<String, FieldValue>) -> Self {
        Self { id, kind, fields }
    }

    /// Returns the storage-assigned identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns all stored field values.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Returns a single field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Consumes the record and returns its field values.
    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }

    /// Flattens the record into a JSON object with an `id` key.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".to_owned(), Value::Number(Number::from(self.id.as_i64())));
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.to_json());
        }

        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use depot_core::EntityId;
    use serde_json::json;

    use super::EntityRecord;
    use crate::{EntityKind, FieldValue};

    #[test]
    fn json_projection_includes_identifier() {
        let record = EntityRecord::new(
            EntityId::new(3),
            EntityKind::Warehouse,
            BTreeMap::from([
                ("warehouse_code".to_owned(), FieldValue::Text("W1".to_owned())),
                ("minimum_capacity".to_owned(), FieldValue::Integer(10)),
            ]),
        );

        assert_eq!(
            record.to_json(),
            json!({"id": 3, "warehouse_code": "W1", "minimum_capacity": 10})
        );
    }
}

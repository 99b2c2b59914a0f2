//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod entity;
mod field;
mod record;
mod schema;
mod validation;

pub use entity::EntityKind;
pub use field::{FieldDefinition, FieldKind, FieldValue};
pub use record::EntityRecord;
pub use schema::{DependencyDeclaration, EntitySchema, SchemaCatalog};
pub use validation::{PayloadMode, ValidatedFields, validate_payload};

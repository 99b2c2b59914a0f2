use std::collections::{BTreeMap, HashSet};

use depot_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{EntityKind, FieldDefinition, FieldKind};

/// Declares that a field stores the identifier of another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    field_name: NonEmptyString,
    referenced: EntityKind,
}

impl DependencyDeclaration {
    /// Creates a dependency declaration.
    pub fn new(field_name: impl Into<String>, referenced: EntityKind) -> AppResult<Self> {
        Ok(Self {
            field_name: NonEmptyString::new(field_name)?,
            referenced,
        })
    }

    /// Returns the field carrying the foreign identifier.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    /// Returns the referenced entity kind.
    #[must_use]
    pub fn referenced(&self) -> EntityKind {
        self.referenced
    }
}

/// Field schema and dependency declarations of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    kind: EntityKind,
    fields: Vec<FieldDefinition>,
    dependencies: Vec<DependencyDeclaration>,
}

impl EntitySchema {
    /// Creates a schema with invariant checks.
    pub fn new(
        kind: EntityKind,
        fields: Vec<FieldDefinition>,
        dependencies: Vec<DependencyDeclaration>,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name() == "id" {
                return Err(AppError::Validation(format!(
                    "schema for '{}' cannot declare the reserved field 'id'",
                    kind.as_str()
                )));
            }

            if !seen.insert(field.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate field '{}' in schema for '{}'",
                    field.name(),
                    kind.as_str()
                )));
            }
        }

        for dependency in &dependencies {
            let declared = fields
                .iter()
                .find(|field| field.name() == dependency.field_name());

            match declared {
                Some(field) if field.kind() == FieldKind::Integer => {}
                Some(_) => {
                    return Err(AppError::Validation(format!(
                        "dependency field '{}' in schema for '{}' must be an integer field",
                        dependency.field_name(),
                        kind.as_str()
                    )));
                }
                None => {
                    return Err(AppError::Validation(format!(
                        "dependency field '{}' is not declared in schema for '{}'",
                        dependency.field_name(),
                        kind.as_str()
                    )));
                }
            }
        }

        Ok(Self {
            kind,
            fields,
            dependencies,
        })
    }

    /// Returns the entity kind described by the schema.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns all fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns dependency declarations in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyDeclaration] {
        &self.dependencies
    }

    /// Returns the business-key fields in declaration order.
    pub fn business_keys(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.is_business_key())
    }
}

/// Registry of entity schemas keyed by entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    schemas: BTreeMap<EntityKind, EntitySchema>,
}

impl SchemaCatalog {
    /// Creates a catalog, rejecting duplicate kinds and dangling dependencies.
    pub fn new(schemas: Vec<EntitySchema>) -> AppResult<Self> {
        let mut registered = BTreeMap::new();
        for schema in schemas {
            let kind = schema.kind();
            if registered.insert(kind, schema).is_some() {
                return Err(AppError::Validation(format!(
                    "schema for '{}' is registered twice",
                    kind.as_str()
                )));
            }
        }

        for schema in registered.values() {
            for dependency in schema.dependencies() {
                if !registered.contains_key(&dependency.referenced()) {
                    return Err(AppError::Validation(format!(
                        "field '{}' of '{}' references unregistered entity '{}'",
                        dependency.field_name(),
                        schema.kind().as_str(),
                        dependency.referenced().as_str()
                    )));
                }
            }
        }

        Ok(Self {
            schemas: registered,
        })
    }

    /// Returns the schema registered for an entity kind.
    pub fn schema(&self, kind: EntityKind) -> AppResult<&EntitySchema> {
        self.schemas.get(&kind).ok_or_else(|| {
            AppError::NotFound(format!(
                "no schema is registered for entity '{}'",
                kind.as_str()
            ))
        })
    }

    /// Returns every registered schema ordered by entity kind.
    pub fn schemas(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.values()
    }

    /// Returns the dependency declarations, across all schemas, that point at `kind`.
    #[must_use]
    pub fn referencing(&self, kind: EntityKind) -> Vec<(&EntitySchema, &DependencyDeclaration)> {
        self.schemas
            .values()
            .flat_map(|schema| {
                schema
                    .dependencies()
                    .iter()
                    .filter(move |dependency| dependency.referenced() == kind)
                    .map(move |dependency| (schema, dependency))
            })
            .collect()
    }
}

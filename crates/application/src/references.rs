use std::fmt::{Display, Formatter};
use std::sync::Arc;

use depot_core::{AppError, EntityId};
use depot_domain::{DependencyDeclaration, EntityKind, SchemaCatalog, ValidatedFields};
use tracing::debug;

use crate::EntityStore;

/// Why a declared dependency could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceFailureCause {
    /// The referenced identifier does not exist.
    NotFound,
    /// The existence lookup itself failed.
    LookupFailed(String),
}

/// First unresolved dependency of a dependent entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFailure {
    /// Field carrying the foreign identifier.
    pub field: String,
    /// Referenced entity kind.
    pub referenced: EntityKind,
    /// Identifier that failed to resolve.
    pub id: EntityId,
    /// Failure cause.
    pub cause: ReferenceFailureCause,
}

impl Display for ReferenceFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            ReferenceFailureCause::NotFound => write!(
                formatter,
                "field '{}' references missing {} '{}'",
                self.field,
                self.referenced.as_str(),
                self.id
            ),
            ReferenceFailureCause::LookupFailed(reason) => write!(
                formatter,
                "failed to resolve {} '{}' for field '{}': {reason}",
                self.referenced.as_str(),
                self.id,
                self.field
            ),
        }
    }
}

impl From<ReferenceFailure> for AppError {
    fn from(failure: ReferenceFailure) -> Self {
        match failure.cause {
            ReferenceFailureCause::NotFound => AppError::MissingReference {
                field: failure.field,
                entity: failure.referenced.as_str().to_owned(),
                id: failure.id,
            },
            ReferenceFailureCause::LookupFailed(_) => AppError::LookupFailed(failure.to_string()),
        }
    }
}

/// Verifies that foreign identifiers of a dependent entity resolve.
#[derive(Clone)]
pub struct ReferenceGate {
    store: Arc<dyn EntityStore>,
    catalog: Arc<SchemaCatalog>,
}

impl ReferenceGate {
    /// Creates a gate over the given store and catalog.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, catalog: Arc<SchemaCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Checks dependencies in declaration order and stops at the first failure.
    ///
    /// Dependencies whose field is absent from `fields` are skipped; required
    /// ones are already enforced by payload validation.
    pub async fn check_references(
        &self,
        dependencies: &[DependencyDeclaration],
        fields: &ValidatedFields,
    ) -> Result<(), ReferenceFailure> {
        for dependency in dependencies {
            let Some(id) = fields
                .get(dependency.field_name())
                .and_then(|value| value.as_integer())
                .map(EntityId::new)
            else {
                continue;
            };

            let failure = |cause| ReferenceFailure {
                field: dependency.field_name().to_owned(),
                referenced: dependency.referenced(),
                id,
                cause,
            };

            let schema = self
                .catalog
                .schema(dependency.referenced())
                .map_err(|error| failure(ReferenceFailureCause::LookupFailed(error.to_string())))?;

            match self.store.get(schema, id).await {
                Ok(Some(_)) => {
                    debug!(
                        field = dependency.field_name(),
                        referenced = dependency.referenced().as_str(),
                        id = %id,
                        "reference resolved"
                    );
                }
                Ok(None) => return Err(failure(ReferenceFailureCause::NotFound)),
                Err(error) => {
                    return Err(failure(ReferenceFailureCause::LookupFailed(
                        error.to_string(),
                    )));
                }
            }
        }

        Ok(())
    }
}

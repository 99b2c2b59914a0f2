//! Business-key uniqueness checks.
//!
//! The check and the subsequent write are separate storage round-trips and
//! no transaction spans them: two concurrent writers can both pass the check
//! and persist the same business key. `PostgresEntityStore` backs the
//! business keys with UNIQUE constraints and reports the losing write as a
//! conflict. `InMemoryEntityStore` re-checks keys under its write lock.

use std::sync::Arc;

use depot_core::{AppError, AppResult, EntityId};
use depot_domain::{EntitySchema, FieldValue, ValidatedFields};
use tracing::debug;

use crate::EntityStore;

/// Decides whether a business-key value is already held by another entity.
#[derive(Clone)]
pub struct UniquenessArbiter {
    store: Arc<dyn EntityStore>,
}

impl UniquenessArbiter {
    /// Creates an arbiter over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Fails with `Conflict` when an entity other than `self_id` holds `candidate`.
    ///
    /// `self_id` is `None` on create, so any holder conflicts.
    pub async fn check_unique(
        &self,
        schema: &EntitySchema,
        field_name: &str,
        candidate: &FieldValue,
        self_id: Option<EntityId>,
    ) -> AppResult<()> {
        let in_use = self
            .store
            .value_in_use(schema, field_name, candidate, self_id)
            .await
            .map_err(|error| match error {
                AppError::LookupFailed(message) => AppError::LookupFailed(message),
                other => AppError::LookupFailed(format!(
                    "failed to check uniqueness of {}.{}: {other}",
                    schema.kind().as_str(),
                    field_name
                )),
            })?;

        if in_use {
            return Err(AppError::Conflict(format!(
                "{} with {} '{}' already exists",
                schema.kind().as_str(),
                field_name,
                candidate
            )));
        }

        Ok(())
    }

    /// Checks every business-key field present in `fields`, in schema order.
    pub async fn check_fields(
        &self,
        schema: &EntitySchema,
        fields: &ValidatedFields,
        self_id: Option<EntityId>,
    ) -> AppResult<()> {
        for key in schema.business_keys() {
            let Some(candidate) = fields.get(key.name()) else {
                continue;
            };

            self.check_unique(schema, key.name(), candidate, self_id)
                .await?;
            debug!(
                entity = schema.kind().as_str(),
                field = key.name(),
                "business key is available"
            );
        }

        Ok(())
    }
}

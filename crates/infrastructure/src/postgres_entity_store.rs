use async_trait::async_trait;
use chrono::NaiveDate;
use depot_application::{CompiledUpdate, EntityStore, quote_identifier};
use depot_core::{AppError, AppResult, EntityId};
use depot_domain::{
    EntityKind, EntityRecord, EntitySchema, FieldKind, FieldValue, ValidatedFields,
};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

mod rows;

use rows::{Write, bind_value, constraint_violation, push_bind_value, record_from_row};

/// PostgreSQL-backed entity store with one table per entity kind.
#[derive(Clone)]
pub struct PostgresEntityStore {
    pool: PgPool,
}

impl PostgresEntityStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table(kind: EntityKind) -> String {
    quote_identifier(kind.table_name())
}

#[async_trait]
impl EntityStore for PostgresEntityStore {
    async fn create(
        &self,
        schema: &EntitySchema,
        fields: &ValidatedFields,
    ) -> AppResult<EntityRecord> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", table(schema.kind())));
        let mut columns = builder.separated(", ");
        for (name, _) in fields.iter() {
            columns.push(quote_identifier(name));
        }
        builder.push(") VALUES (");
        let mut values = builder.separated(", ");
        for (_, value) in fields.iter() {
            push_bind_value(&mut values, value);
        }
        builder.push(") RETURNING *");

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                constraint_violation(&error, schema.kind(), Write::Insert).unwrap_or_else(|| {
                    AppError::Internal(format!(
                        "failed to create {}: {error}",
                        schema.kind().as_str()
                    ))
                })
            })?;

        record_from_row(schema, &row)
    }

    async fn get(&self, schema: &EntitySchema, id: EntityId) -> AppResult<Option<EntityRecord>> {
        let statement = format!("SELECT * FROM {} WHERE \"id\" = $1", table(schema.kind()));
        let row = sqlx::query(&statement)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::LookupFailed(format!(
                    "failed to load {} '{}': {error}",
                    schema.kind().as_str(),
                    id
                ))
            })?;

        row.map(|row| record_from_row(schema, &row)).transpose()
    }

    async fn list(&self, schema: &EntitySchema) -> AppResult<Vec<EntityRecord>> {
        let statement = format!("SELECT * FROM {} ORDER BY \"id\"", table(schema.kind()));
        let rows: Vec<PgRow> = sqlx::query(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::LookupFailed(format!(
                    "failed to list {}: {error}",
                    schema.kind().table_name()
                ))
            })?;

        rows.iter().map(|row| record_from_row(schema, row)).collect()
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        let statement = format!("DELETE FROM {} WHERE \"id\" = $1", table(kind));
        let result = sqlx::query(&statement)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                constraint_violation(&error, kind, Write::Delete).unwrap_or_else(|| {
                    AppError::Internal(format!(
                        "failed to delete {} '{}': {error}",
                        kind.as_str(),
                        id
                    ))
                })
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn raw_update(&self, update: &CompiledUpdate) -> AppResult<u64> {
        let mut query: Query<'_, Postgres, PgArguments> = sqlx::query(update.statement());
        for value in update.values() {
            query = bind_value(query, value);
        }

        let result = query
            .bind(update.id().as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                constraint_violation(&error, update.kind(), Write::Update).unwrap_or_else(|| {
                    AppError::Internal(format!(
                        "failed to update {} '{}': {error}",
                        update.kind().as_str(),
                        update.id()
                    ))
                })
            })?;

        Ok(result.rows_affected())
    }

    async fn value_in_use(
        &self,
        schema: &EntitySchema,
        field_name: &str,
        value: &FieldValue,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        let field = schema.field(field_name).ok_or_else(|| AppError::UnknownField {
            entity: schema.kind().as_str().to_owned(),
            field: field_name.to_owned(),
        })?;
        if field.kind() != value.kind() {
            return Err(AppError::InvalidType {
                field: field_name.to_owned(),
                expected: field.kind().as_str(),
            });
        }

        let statement = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND ($2::BIGINT IS NULL OR \"id\" <> $2))",
            table(schema.kind()),
            quote_identifier(field.name())
        );
        let row = bind_value(sqlx::query(&statement), value)
            .bind(excluding.map(|id| id.as_i64()))
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::LookupFailed(format!(
                    "failed to check {}.{}: {error}",
                    schema.kind().as_str(),
                    field_name
                ))
            })?;

        row.try_get::<bool, _>(0).map_err(|error| {
            AppError::LookupFailed(format!(
                "failed to decode existence check for {}.{}: {error}",
                schema.kind().as_str(),
                field_name
            ))
        })
    }
}

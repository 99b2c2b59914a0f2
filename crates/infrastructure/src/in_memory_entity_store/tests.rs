use std::sync::Arc;

use depot_application::{CompiledUpdate, EntityStore, InventoryService, apply_partial_update};
use depot_core::{AppError, EntityId, ResultCode};
use depot_domain::{
    EntityKind, FieldValue, PayloadMode, SchemaCatalog, ValidatedFields, validate_payload,
};
use serde_json::{Value, json};

use super::InMemoryEntityStore;

fn catalog() -> Arc<SchemaCatalog> {
    Arc::new(SchemaCatalog::standard().unwrap_or_else(|_| unreachable!()))
}

fn validated(catalog: &SchemaCatalog, kind: EntityKind, payload: &Value) -> ValidatedFields {
    let schema = catalog.schema(kind).unwrap_or_else(|_| unreachable!());
    validate_payload(schema, payload, PayloadMode::Create).unwrap_or_else(|_| unreachable!())
}

fn warehouse(code: &str) -> Value {
    json!({
        "warehouse_code": code,
        "address": "Calle 7 123",
        "telephone": "221445566",
        "minimum_capacity": 10,
        "minimum_temperature": -4.0,
    })
}

#[tokio::test]
async fn identifiers_are_assigned_per_kind() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());

    let first = store
        .create(schema, &validated(&catalog, EntityKind::Warehouse, &warehouse("W1")))
        .await;
    let second = store
        .create(schema, &validated(&catalog, EntityKind::Warehouse, &warehouse("W2")))
        .await;

    assert_eq!(first.map(|record| record.id()).ok(), Some(EntityId::new(1)));
    assert_eq!(second.map(|record| record.id()).ok(), Some(EntityId::new(2)));

    let listed = store.list(schema).await.unwrap_or_default();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].id() < listed[1].id());
}

#[tokio::test]
async fn duplicate_business_key_is_a_conflict() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());
    let fields = validated(&catalog, EntityKind::Warehouse, &warehouse("W1"));

    assert!(store.create(schema, &fields).await.is_ok());
    let duplicate = store.create(schema, &fields).await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn raw_update_merges_assignments() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());
    let created = store
        .create(schema, &validated(&catalog, EntityKind::Warehouse, &warehouse("W1")))
        .await
        .unwrap_or_else(|_| unreachable!());

    let changes = validate_payload(schema, &json!({"address": "Ruta 2 km 40"}), PayloadMode::Update)
        .unwrap_or_else(|_| unreachable!());
    let update = CompiledUpdate::compile(schema, created.id(), &changes)
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(store.raw_update(&update).await.ok(), Some(1));

    let reloaded = store
        .get(schema, created.id())
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    assert_eq!(
        reloaded.field("address"),
        Some(&FieldValue::Text("Ruta 2 km 40".to_owned()))
    );
    assert_eq!(reloaded.field("warehouse_code"), created.field("warehouse_code"));
}

#[tokio::test]
async fn raw_update_of_missing_row_touches_nothing() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());
    let changes = validate_payload(schema, &json!({"address": "Nowhere"}), PayloadMode::Update)
        .unwrap_or_else(|_| unreachable!());
    let update = CompiledUpdate::compile(schema, EntityId::new(77), &changes)
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(store.raw_update(&update).await.ok(), Some(0));
}

#[tokio::test]
async fn referenced_rows_cannot_be_deleted() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let warehouse_schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());
    let employee_schema = catalog
        .schema(EntityKind::Employee)
        .unwrap_or_else(|_| unreachable!());

    let created = store
        .create(
            warehouse_schema,
            &validated(&catalog, EntityKind::Warehouse, &warehouse("W1")),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let employee = store
        .create(
            employee_schema,
            &validated(
                &catalog,
                EntityKind::Employee,
                &json!({
                    "card_number_id": "E-1",
                    "first_name": "Juan",
                    "last_name": "Perez",
                    "warehouse_id": created.id().as_i64(),
                }),
            ),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let blocked = store.delete(EntityKind::Warehouse, created.id()).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    assert_eq!(
        store.delete(EntityKind::Employee, employee.id()).await.ok(),
        Some(true)
    );
    assert_eq!(
        store.delete(EntityKind::Warehouse, created.id()).await.ok(),
        Some(true)
    );
    assert_eq!(
        store.delete(EntityKind::Warehouse, created.id()).await.ok(),
        Some(false)
    );
}

#[tokio::test]
async fn warehouse_lifecycle_through_the_service() {
    let catalog = catalog();
    let store = Arc::new(InMemoryEntityStore::new(catalog.clone()));
    let service = InventoryService::new(store, catalog);

    let created = service
        .create_reply(EntityKind::Warehouse, warehouse("W1"))
        .await;
    assert_eq!(created.code(), ResultCode::Created);
    let id = created
        .payload()
        .map(|record| record.id())
        .unwrap_or_else(|| unreachable!());

    let too_long = service
        .update_reply(
            EntityKind::Warehouse,
            id,
            json!({"telephone": "0123456789012345678901"}),
        )
        .await;
    assert_eq!(too_long.code(), ResultCode::BadInput);

    let updated = service
        .update_reply(EntityKind::Warehouse, id, json!({"telephone": "2214000000"}))
        .await;
    assert_eq!(updated.code(), ResultCode::Updated);
    assert_eq!(
        updated
            .payload()
            .and_then(|record| record.field("minimum_capacity").cloned()),
        Some(FieldValue::Integer(10))
    );

    let deleted = service.delete_reply(EntityKind::Warehouse, id).await;
    assert_eq!(deleted.code(), ResultCode::NoContent);
}

#[tokio::test]
async fn create_with_missing_dependency_is_rejected() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let schema = catalog
        .schema(EntityKind::Employee)
        .unwrap_or_else(|_| unreachable!());
    let fields = validated(
        &catalog,
        EntityKind::Employee,
        &json!({
            "card_number_id": "E-9",
            "first_name": "Ana",
            "last_name": "Diaz",
            "warehouse_id": 42,
        }),
    );

    let created = store.create(schema, &fields).await;

    assert!(matches!(
        &created,
        Err(AppError::MissingReference { field, id, .. })
            if field == "warehouse_id" && *id == EntityId::new(42)
    ));
    assert!(store.list(schema).await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn raw_update_to_missing_dependency_keeps_the_row() {
    let catalog = catalog();
    let store = InMemoryEntityStore::new(catalog.clone());
    let warehouse_schema = catalog
        .schema(EntityKind::Warehouse)
        .unwrap_or_else(|_| unreachable!());
    let employee_schema = catalog
        .schema(EntityKind::Employee)
        .unwrap_or_else(|_| unreachable!());
    let warehouse = store
        .create(
            warehouse_schema,
            &validated(&catalog, EntityKind::Warehouse, &warehouse("W1")),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let employee = store
        .create(
            employee_schema,
            &validated(
                &catalog,
                EntityKind::Employee,
                &json!({
                    "card_number_id": "E-1",
                    "first_name": "Juan",
                    "last_name": "Perez",
                    "warehouse_id": warehouse.id().as_i64(),
                }),
            ),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let changes = validate_payload(
        employee_schema,
        &json!({"warehouse_id": 999}),
        PayloadMode::Update,
    )
    .unwrap_or_else(|_| unreachable!());
    let update = CompiledUpdate::compile(employee_schema, employee.id(), &changes)
        .unwrap_or_else(|_| unreachable!());

    let applied = apply_partial_update(&store, employee_schema, &update).await;
    assert!(matches!(applied, Err(AppError::MissingReference { .. })));

    let reloaded = store
        .get(employee_schema, employee.id())
        .await
        .ok()
        .flatten();
    assert_eq!(reloaded, Some(employee));
}

#[tokio::test]
async fn service_update_with_dangling_reference_is_not_found() {
    let catalog = catalog();
    let store = Arc::new(InMemoryEntityStore::new(catalog.clone()));
    let service = InventoryService::new(store, catalog);

    let warehouse = service
        .create(EntityKind::Warehouse, warehouse("W1"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let employee = service
        .create(
            EntityKind::Employee,
            json!({
                "card_number_id": "E-1",
                "first_name": "Juan",
                "last_name": "Perez",
                "warehouse_id": warehouse.id().as_i64(),
            }),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let reply = service
        .update_reply(EntityKind::Employee, employee.id(), json!({"warehouse_id": 999}))
        .await;

    assert_eq!(reply.code(), ResultCode::NotFound);
    assert!(
        reply
            .message()
            .is_some_and(|message| message.contains("warehouse_id"))
    );
}

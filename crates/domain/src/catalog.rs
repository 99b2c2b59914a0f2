use depot_core::AppResult;

use crate::{
    DependencyDeclaration, EntityKind, EntitySchema, FieldDefinition, FieldKind, SchemaCatalog,
};

const NAME_LENGTH: usize = 255;
const TELEPHONE_LENGTH: usize = 20;

fn text(name: &str, max_length: usize) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Text, Some(max_length), true, false)
}

fn text_key(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Text, Some(NAME_LENGTH), true, true)
}

fn integer(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Integer, None, true, false)
}

fn integer_key(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Integer, None, true, true)
}

fn optional_integer(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Integer, None, false, false)
}

fn float(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Float, None, true, false)
}

fn date(name: &str) -> AppResult<FieldDefinition> {
    FieldDefinition::new(name, FieldKind::Date, None, true, false)
}

fn depends(field_name: &str, referenced: EntityKind) -> AppResult<DependencyDeclaration> {
    DependencyDeclaration::new(field_name, referenced)
}

impl SchemaCatalog {
    /// Returns the catalog of every entity managed by the warehouse backend.
    pub fn standard() -> AppResult<Self> {
        Self::new(vec![
            EntitySchema::new(
                EntityKind::Buyer,
                vec![
                    text_key("card_number_id")?,
                    text("first_name", NAME_LENGTH)?,
                    text("last_name", NAME_LENGTH)?,
                ],
                vec![],
            )?,
            EntitySchema::new(
                EntityKind::Locality,
                vec![
                    text("locality_name", NAME_LENGTH)?,
                    text("province_name", NAME_LENGTH)?,
                    text("country_name", NAME_LENGTH)?,
                ],
                vec![],
            )?,
            EntitySchema::new(
                EntityKind::Seller,
                vec![
                    integer_key("cid")?,
                    text("company_name", NAME_LENGTH)?,
                    text("address", NAME_LENGTH)?,
                    text("telephone", TELEPHONE_LENGTH)?,
                    integer("locality_id")?,
                ],
                vec![depends("locality_id", EntityKind::Locality)?],
            )?,
            EntitySchema::new(
                EntityKind::Carrier,
                vec![
                    text_key("cid")?,
                    text("company_name", NAME_LENGTH)?,
                    text("address", NAME_LENGTH)?,
                    text("telephone", TELEPHONE_LENGTH)?,
                    integer("locality_id")?,
                ],
                vec![depends("locality_id", EntityKind::Locality)?],
            )?,
            EntitySchema::new(
                EntityKind::Warehouse,
                vec![
                    text_key("warehouse_code")?,
                    text("address", NAME_LENGTH)?,
                    text("telephone", TELEPHONE_LENGTH)?,
                    integer("minimum_capacity")?,
                    float("minimum_temperature")?,
                ],
                vec![],
            )?,
            EntitySchema::new(
                EntityKind::Section,
                vec![
                    integer_key("section_number")?,
                    float("current_temperature")?,
                    float("minimum_temperature")?,
                    integer("current_capacity")?,
                    integer("minimum_capacity")?,
                    integer("maximum_capacity")?,
                    integer("warehouse_id")?,
                    integer("product_type_id")?,
                ],
                vec![depends("warehouse_id", EntityKind::Warehouse)?],
            )?,
            EntitySchema::new(
                EntityKind::Employee,
                vec![
                    text_key("card_number_id")?,
                    text("first_name", NAME_LENGTH)?,
                    text("last_name", NAME_LENGTH)?,
                    integer("warehouse_id")?,
                ],
                vec![depends("warehouse_id", EntityKind::Warehouse)?],
            )?,
            EntitySchema::new(
                EntityKind::Product,
                vec![
                    text_key("product_code")?,
                    text("description", NAME_LENGTH)?,
                    float("width")?,
                    float("height")?,
                    float("length")?,
                    float("net_weight")?,
                    float("expiration_rate")?,
                    float("recommended_freezing_temperature")?,
                    float("freezing_rate")?,
                    integer("product_type_id")?,
                    optional_integer("seller_id")?,
                ],
                vec![depends("seller_id", EntityKind::Seller)?],
            )?,
            EntitySchema::new(
                EntityKind::ProductBatch,
                vec![
                    integer_key("batch_number")?,
                    integer("current_quantity")?,
                    float("current_temperature")?,
                    date("due_date")?,
                    integer("initial_quantity")?,
                    date("manufacturing_date")?,
                    integer("manufacturing_hour")?,
                    float("minimum_temperature")?,
                    integer("product_id")?,
                    integer("section_id")?,
                ],
                vec![
                    depends("product_id", EntityKind::Product)?,
                    depends("section_id", EntityKind::Section)?,
                ],
            )?,
            EntitySchema::new(
                EntityKind::ProductRecord,
                vec![
                    date("last_update_date")?,
                    float("purchase_price")?,
                    float("sale_price")?,
                    integer("product_id")?,
                ],
                vec![depends("product_id", EntityKind::Product)?],
            )?,
            EntitySchema::new(
                EntityKind::OrderStatus,
                vec![text("description", NAME_LENGTH)?],
                vec![],
            )?,
            EntitySchema::new(
                EntityKind::PurchaseOrder,
                vec![
                    text_key("order_number")?,
                    date("order_date")?,
                    text("tracking_code", NAME_LENGTH)?,
                    integer("buyer_id")?,
                    integer("product_record_id")?,
                    integer("order_status_id")?,
                ],
                vec![
                    depends("buyer_id", EntityKind::Buyer)?,
                    depends("product_record_id", EntityKind::ProductRecord)?,
                    depends("order_status_id", EntityKind::OrderStatus)?,
                ],
            )?,
            EntitySchema::new(
                EntityKind::InboundOrder,
                vec![
                    text_key("order_number")?,
                    date("order_date")?,
                    integer("employee_id")?,
                    integer("warehouse_id")?,
                    integer("product_batch_id")?,
                ],
                vec![
                    depends("employee_id", EntityKind::Employee)?,
                    depends("warehouse_id", EntityKind::Warehouse)?,
                    depends("product_batch_id", EntityKind::ProductBatch)?,
                ],
            )?,
        ])
    }
}

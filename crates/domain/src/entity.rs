use std::fmt::{Display, Formatter};
use std::str::FromStr;

use depot_core::AppError;
use serde::{Deserialize, Serialize};

/// Managed record types of the warehouse backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Customer placing purchase orders.
    Buyer,
    /// Company supplying products.
    Seller,
    /// Catalog product.
    Product,
    /// Physical warehouse.
    Warehouse,
    /// Storage section inside a warehouse.
    Section,
    /// Warehouse employee.
    Employee,
    /// Geographic locality.
    Locality,
    /// Transport carrier.
    Carrier,
    /// Lookup table of purchase order states.
    OrderStatus,
    /// Buyer purchase order.
    PurchaseOrder,
    /// Stock received into a warehouse.
    InboundOrder,
    /// Batch of a product stored in a section.
    ProductBatch,
    /// Price history record for a product.
    ProductRecord,
}

impl EntityKind {
    /// Every managed entity kind, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Buyer,
        Self::Seller,
        Self::Product,
        Self::Warehouse,
        Self::Section,
        Self::Employee,
        Self::Locality,
        Self::Carrier,
        Self::OrderStatus,
        Self::PurchaseOrder,
        Self::InboundOrder,
        Self::ProductBatch,
        Self::ProductRecord,
    ];

    /// Returns the stable logical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Product => "product",
            Self::Warehouse => "warehouse",
            Self::Section => "section",
            Self::Employee => "employee",
            Self::Locality => "locality",
            Self::Carrier => "carrier",
            Self::OrderStatus => "order_status",
            Self::PurchaseOrder => "purchase_order",
            Self::InboundOrder => "inbound_order",
            Self::ProductBatch => "product_batch",
            Self::ProductRecord => "product_record",
        }
    }

    /// Returns the relational table backing the entity kind.
    #[must_use]
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Buyer => "buyers",
            Self::Seller => "sellers",
            Self::Product => "products",
            Self::Warehouse => "warehouses",
            Self::Section => "sections",
            Self::Employee => "employees",
            Self::Locality => "localities",
            Self::Carrier => "carriers",
            Self::OrderStatus => "order_statuses",
            Self::PurchaseOrder => "purchase_orders",
            Self::InboundOrder => "inbound_orders",
            Self::ProductBatch => "product_batches",
            Self::ProductRecord => "product_records",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown entity kind '{value}'")))
    }
}

//! Application services and ports.

#![forbid(unsafe_code)]

mod entity_ports;
mod inventory_service;
mod partial_update;
mod references;
mod result_mapper;
mod uniqueness;

pub use entity_ports::EntityStore;
pub use inventory_service::InventoryService;
pub use partial_update::{CompiledUpdate, apply_partial_update, quote_identifier};
pub use references::{ReferenceFailure, ReferenceFailureCause, ReferenceGate};
pub use result_mapper::{Operation, Reply};
pub use uniqueness::UniquenessArbiter;

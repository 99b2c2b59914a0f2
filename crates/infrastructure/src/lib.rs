//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod config;
mod database;
mod in_memory_entity_store;
mod postgres_entity_store;
mod telemetry;

pub use config::StoreConfig;
pub use database::connect_and_migrate;
pub use in_memory_entity_store::InMemoryEntityStore;
pub use postgres_entity_store::PostgresEntityStore;
pub use telemetry::{init_tracing, try_init_tracing};

//! Stored schema catalog.
//!
//! The catalog holds the on-disk shape of every entity (fields, nullability,
//! indexes, primary keys, links) as versioned snapshots.

mod catalog;
mod config;
mod entity;
mod field;
mod schema;
mod types;

pub use catalog::Catalog;
pub use config::{CatalogConfig, DEFAULT_DATA_PATH};
pub use entity::StoredEntity;
pub use field::StoredField;
pub use schema::StoredSchema;
pub use types::{ScalarType, StoredType};

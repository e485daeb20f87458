//! Automatic schema migration.
//!
//! Compares the entities declared in code against the stored schema and
//! applies the structural edits needed to make them match:
//!
//! - Entities missing from storage are created, entities no longer declared
//!   are dropped
//! - Fields are added or removed per entity
//! - Index, nullability and primary key state is reconciled on value fields
//!
//! The engine only talks to storage through [`SchemaEditor`] and never
//! touches row data. Running it twice against the same targets leaves the
//! second report empty.

mod auto;
mod classify;
mod config;
mod edit;
mod editor;
mod error;
mod field_sync;
mod schema_sync;

pub use auto::{AutoMigration, MigrationOutcome};
pub use classify::{classify, FieldKind, IgnoreReason};
pub use config::{DanglingLinkPolicy, MigrationConfig};
pub use edit::{SchemaEdit, SyncReport};
pub use editor::SchemaEditor;
pub use error::MigrationError;
pub use field_sync::synchronize_fields;
pub use schema_sync::synchronize;

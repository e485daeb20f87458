//! automig core - automatic schema reconciliation for embedded object stores.
//!
//! Entities declared in code are described by [`EntityDescriptor`]s. On
//! startup, [`AutoMigration`] compares them with the [`StoredSchema`] and
//! applies the structural edits that bring storage in line: entities and
//! fields are created or removed, and index, nullability and primary key
//! state is reconciled. The [`Catalog`] persists versioned schema snapshots
//! in sled and applies a migration all-or-nothing.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod migration;
pub mod session;

pub use catalog::{
    Catalog, CatalogConfig, ScalarType, StoredEntity, StoredField, StoredSchema, StoredType,
};
pub use descriptor::{
    DeclaredType, DescriptorSource, EntityDescriptor, FieldAttributes, FieldDescriptor,
    FieldModifiers, Model, ModelSet, Primitive,
};
pub use error::Error;
pub use migration::{
    classify, AutoMigration, DanglingLinkPolicy, FieldKind, IgnoreReason, MigrationConfig,
    MigrationError, MigrationOutcome, SchemaEdit, SchemaEditor, SyncReport,
};
pub use session::{Session, SessionGuard, SessionManager};

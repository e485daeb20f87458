//! Core error types.

use thiserror::Error;

/// Core errors raised by the stored schema, the catalog, and sessions.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Descriptor file could not be parsed.
    #[error("descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity is not present in the stored schema.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Entity is already present in the stored schema.
    #[error("entity already exists: {0}")]
    EntityExists(String),

    /// Field is not present on the stored entity.
    #[error("field not found: {entity}.{field}")]
    FieldNotFound {
        /// Owning entity.
        entity: String,
        /// Missing field.
        field: String,
    },

    /// Field is already present on the stored entity.
    #[error("field already exists: {entity}.{field}")]
    FieldExists {
        /// Owning entity.
        entity: String,
        /// Duplicate field.
        field: String,
    },

    /// Operation is only valid for scalar fields.
    #[error("field {entity}.{field} is a relationship and has no {attribute}")]
    NotScalar {
        /// Owning entity.
        entity: String,
        /// Relationship field.
        field: String,
        /// Attribute that was touched.
        attribute: &'static str,
    },

    /// The index of a primary key field cannot be removed.
    #[error("cannot remove index from primary key {entity}.{field}")]
    PrimaryKeyIndex {
        /// Owning entity.
        entity: String,
        /// Primary key field.
        field: String,
    },

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Schema version is not present in the catalog.
    #[error("schema version not found: {0}")]
    VersionNotFound(u64),

    /// No default catalog configuration has been set on the session manager.
    #[error("no default schema configuration is set")]
    NoDefaultSchemaConfigured,

    /// No session is currently open.
    #[error("no open schema session was found")]
    NoOpenInstance,
}

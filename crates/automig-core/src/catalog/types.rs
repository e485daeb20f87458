//! Core type definitions for the stored schema.

use rkyv::{Archive, Deserialize, Serialize};

/// Scalar data types a stored field can hold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// Binary data.
    Bytes,
}

/// The structural type of a stored field.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredType {
    /// A scalar value.
    Scalar {
        /// Scalar type of the value.
        scalar: ScalarType,
    },
    /// A reference to a single object of another entity.
    Object {
        /// Name of the linked entity.
        entity: String,
    },
    /// An ordered list of references to objects of another entity.
    List {
        /// Name of the linked entity.
        entity: String,
    },
}

impl ScalarType {
    /// Short lowercase name used in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Bytes => "bytes",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoredType {
    /// Create a scalar stored type.
    pub fn scalar(scalar: ScalarType) -> Self {
        StoredType::Scalar { scalar }
    }

    /// Create a to-one link stored type.
    pub fn object(entity: impl Into<String>) -> Self {
        StoredType::Object {
            entity: entity.into(),
        }
    }

    /// Create a to-many link stored type.
    pub fn list(entity: impl Into<String>) -> Self {
        StoredType::List {
            entity: entity.into(),
        }
    }

    /// Check if this type links to another entity.
    pub fn is_relationship(&self) -> bool {
        matches!(self, StoredType::Object { .. } | StoredType::List { .. })
    }

    /// Name of the linked entity, if this is a relationship.
    pub fn linked_entity(&self) -> Option<&str> {
        match self {
            StoredType::Object { entity } | StoredType::List { entity } => Some(entity),
            StoredType::Scalar { .. } => None,
        }
    }
}

impl std::fmt::Display for StoredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredType::Scalar { scalar } => write!(f, "{scalar}"),
            StoredType::Object { entity } => write!(f, "-> {entity}"),
            StoredType::List { entity } => write!(f, "[{entity}]"),
        }
    }
}

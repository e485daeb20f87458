//! Field classification.
//!
//! Every declared type maps to exactly one [`FieldKind`]. The synchronizers
//! only ever branch on the kind.

use crate::catalog::{ScalarType, StoredType};
use crate::descriptor::DeclaredType;

/// Why a field takes no part in structural migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Derived result set, never stored.
    Computed,
    /// Type that is neither a value nor an entity reference.
    Unrecognized,
}

/// Migration category of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Primitive that can never hold null.
    NonNullPrimitive(ScalarType),
    /// Nullable form of a primitive.
    NullableWrapper(ScalarType),
    /// Text, timestamp or bytes.
    SimpleValue(ScalarType),
    /// Direct reference to the named entity.
    ToOne {
        /// Declared entity name.
        entity: String,
    },
    /// Ordered list of references.
    ToMany,
    /// Excluded from migration.
    Ignored(IgnoreReason),
}

/// Classify a declared type.
pub fn classify(declared: &DeclaredType) -> FieldKind {
    match declared {
        DeclaredType::Primitive(p) => FieldKind::NonNullPrimitive(p.scalar_type()),
        DeclaredType::Nullable(p) => FieldKind::NullableWrapper(p.scalar_type()),
        DeclaredType::Text => FieldKind::SimpleValue(ScalarType::String),
        DeclaredType::Timestamp => FieldKind::SimpleValue(ScalarType::Timestamp),
        DeclaredType::Bytes => FieldKind::SimpleValue(ScalarType::Bytes),
        DeclaredType::Entity(entity) => FieldKind::ToOne {
            entity: entity.clone(),
        },
        DeclaredType::List => FieldKind::ToMany,
        DeclaredType::Backlinks(_) => FieldKind::Ignored(IgnoreReason::Computed),
        DeclaredType::Other(_) => FieldKind::Ignored(IgnoreReason::Unrecognized),
    }
}

impl FieldKind {
    /// Scalar type for value kinds.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            FieldKind::NonNullPrimitive(s)
            | FieldKind::NullableWrapper(s)
            | FieldKind::SimpleValue(s) => Some(*s),
            _ => None,
        }
    }

    /// Value kinds carry index, nullability and primary key attributes.
    pub fn is_scalar(&self) -> bool {
        self.scalar_type().is_some()
    }

    /// Check if this kind is excluded from migration.
    pub fn is_ignored(&self) -> bool {
        matches!(self, FieldKind::Ignored(_))
    }

    /// Check if this kind is a derived result set.
    pub fn is_computed(&self) -> bool {
        matches!(self, FieldKind::Ignored(IgnoreReason::Computed))
    }

    /// Nullability a new field of this kind is created with.
    pub fn nullable_on_create(&self) -> bool {
        !matches!(self, FieldKind::NonNullPrimitive(_))
    }

    /// The stored type a field of this kind is added with.
    ///
    /// `link` overrides the declared entity of a to-one reference and is the
    /// only source of the entity for a list. Returns `None` when the stored
    /// type cannot be determined.
    pub fn stored_type(&self, link: Option<&str>) -> Option<StoredType> {
        match self {
            FieldKind::NonNullPrimitive(s)
            | FieldKind::NullableWrapper(s)
            | FieldKind::SimpleValue(s) => Some(StoredType::scalar(*s)),
            FieldKind::ToOne { entity } => Some(StoredType::object(link.unwrap_or(entity))),
            FieldKind::ToMany => link.map(StoredType::list),
            FieldKind::Ignored(_) => None,
        }
    }
}

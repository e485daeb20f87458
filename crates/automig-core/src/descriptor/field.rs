//! Field descriptors.

use super::types::{DeclaredType, Primitive};

/// Attributes requested for a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldAttributes {
    /// Field should carry a search index.
    pub indexed: bool,
    /// Field must not hold null.
    pub required: bool,
    /// Field is the primary key. Implies `indexed`.
    pub primary_key: bool,
}

impl FieldAttributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a search index.
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Request a non-nullable field.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Request the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Whether the field should end up indexed.
    pub fn wants_index(&self) -> bool {
        self.indexed || self.primary_key
    }
}

/// Language-level modifiers on a declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldModifiers {
    /// Field belongs to the type, not to instances.
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Field is excluded from persistence by the language.
    #[serde(rename = "transient")]
    pub is_transient: bool,
}

/// A declared field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldDescriptor {
    /// Field name (unique within its entity).
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,
    /// Language-level modifiers.
    #[serde(default)]
    pub modifiers: FieldModifiers,
    /// Explicitly excluded from migration.
    #[serde(default)]
    pub ignored: bool,
    /// Requested attributes. `None` leaves stored attributes untouched.
    #[serde(default)]
    pub attributes: Option<FieldAttributes>,
    /// Linked entity name. Required for lists.
    #[serde(default)]
    pub link: Option<String>,
}

impl FieldDescriptor {
    /// Create a field with the given declared type.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            modifiers: FieldModifiers::default(),
            ignored: false,
            attributes: None,
            link: None,
        }
    }

    /// Create a non-nullable primitive field.
    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::new(name, DeclaredType::Primitive(primitive))
    }

    /// Create a nullable primitive field.
    pub fn nullable(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::new(name, DeclaredType::Nullable(primitive))
    }

    /// Create a text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Text)
    }

    /// Create a timestamp field.
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Timestamp)
    }

    /// Create a byte sequence field.
    pub fn bytes(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Bytes)
    }

    /// Create a direct reference to another entity.
    pub fn entity(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Entity(entity.into()))
    }

    /// Create a list field. Use [`FieldDescriptor::linked_to`] to name its entity.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::List)
    }

    /// Create a derived backlinks field.
    pub fn backlinks(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Backlinks(entity.into()))
    }

    /// Set the requested attributes.
    pub fn with_attributes(mut self, attributes: FieldAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Request a search index.
    pub fn indexed(mut self) -> Self {
        self.attributes.get_or_insert_with(FieldAttributes::default).indexed = true;
        self
    }

    /// Request a non-nullable field.
    pub fn required(mut self) -> Self {
        self.attributes.get_or_insert_with(FieldAttributes::default).required = true;
        self
    }

    /// Request the primary key.
    pub fn primary_key(mut self) -> Self {
        self.attributes.get_or_insert_with(FieldAttributes::default).primary_key = true;
        self
    }

    /// Name the linked entity.
    pub fn linked_to(mut self, entity: impl Into<String>) -> Self {
        self.link = Some(entity.into());
        self
    }

    /// Exclude from migration.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Mark as a static field.
    pub fn as_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Mark as a transient field.
    pub fn as_transient(mut self) -> Self {
        self.modifiers.is_transient = true;
        self
    }

    /// Whether this field takes part in migration at all.
    pub fn is_persistent(&self) -> bool {
        !self.modifiers.is_static && !self.modifiers.is_transient && !self.ignored
    }

    /// Whether the primary key was requested.
    pub fn wants_primary_key(&self) -> bool {
        self.attributes.is_some_and(|a| a.primary_key)
    }
}

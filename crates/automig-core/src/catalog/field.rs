//! Stored field shapes.

use super::types::{ScalarType, StoredType};
use rkyv::{Archive, Deserialize, Serialize};

/// A field as it currently exists in the stored schema.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct StoredField {
    /// Field name.
    pub name: String,
    /// Structural type of the field.
    pub stored_type: StoredType,
    /// Whether the field accepts null.
    pub nullable: bool,
    /// Whether the field carries a search index.
    pub indexed: bool,
}

impl StoredField {
    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>, scalar: ScalarType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            stored_type: StoredType::scalar(scalar),
            nullable,
            indexed: false,
        }
    }

    /// Create a to-one link. Links to a single object are always nullable.
    pub fn object(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stored_type: StoredType::object(entity),
            nullable: true,
            indexed: false,
        }
    }

    /// Create a to-many link. Lists are never null, only empty.
    pub fn list(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stored_type: StoredType::list(entity),
            nullable: false,
            indexed: false,
        }
    }

    /// Mark as indexed.
    pub fn with_index(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Check if this field links to another entity.
    pub fn is_relationship(&self) -> bool {
        self.stored_type.is_relationship()
    }

    /// Check if this field links to the given entity.
    pub fn links_to(&self, entity: &str) -> bool {
        self.stored_type.linked_entity() == Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field() {
        let field = StoredField::scalar("name", ScalarType::String, true).with_index();

        assert_eq!(field.name, "name");
        assert!(field.nullable);
        assert!(field.indexed);
        assert!(!field.is_relationship());
    }

    #[test]
    fn test_link_fields() {
        let cat = StoredField::object("cat", "Cat");
        assert!(cat.nullable);
        assert!(cat.links_to("Cat"));
        assert!(!cat.links_to("Dog"));

        let cats = StoredField::list("manyCats", "Cat");
        assert!(!cats.nullable);
        assert!(cats.is_relationship());
    }
}

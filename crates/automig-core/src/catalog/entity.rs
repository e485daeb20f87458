//! Stored entity shapes.

use super::field::StoredField;
use rkyv::{Archive, Deserialize, Serialize};

/// An entity as it currently exists in the stored schema.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct StoredEntity {
    /// Entity name (unique within the schema).
    pub name: String,
    /// Fields in creation order.
    pub fields: Vec<StoredField>,
    /// Name of the primary key field, if any.
    pub primary_key: Option<String>,
}

impl StoredEntity {
    /// Create an entity with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_key: None,
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: StoredField) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the primary key field. The field is indexed as a side effect.
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if let Some(stored) = self.get_field_mut(&field) {
            stored.indexed = true;
        }
        self.primary_key = Some(field);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&StoredField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a mutable field by name.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut StoredField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Field names in creation order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Check if the given field is the primary key.
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.as_deref() == Some(name)
    }

    /// Remove a field, clearing the primary key if it pointed at it.
    pub(crate) fn remove_field(&mut self, name: &str) -> Option<StoredField> {
        let position = self.fields.iter().position(|f| f.name == name)?;
        if self.is_primary_key(name) {
            self.primary_key = None;
        }
        Some(self.fields.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;

    fn sample_dog() -> StoredEntity {
        StoredEntity::new("Dog")
            .with_field(StoredField::scalar("id", ScalarType::Int64, false))
            .with_field(StoredField::scalar("name", ScalarType::String, true))
            .with_field(StoredField::object("cat", "Cat"))
            .with_field(StoredField::list("manyCats", "Cat"))
            .with_primary_key("id")
    }

    #[test]
    fn test_entity_builder() {
        let dog = sample_dog();

        assert_eq!(dog.name, "Dog");
        assert_eq!(dog.field_names(), vec!["id", "name", "cat", "manyCats"]);
        assert!(dog.is_primary_key("id"));
        assert!(dog.get_field("id").unwrap().indexed);
        assert!(!dog.get_field("name").unwrap().indexed);
    }

    #[test]
    fn test_remove_primary_key_field() {
        let mut dog = sample_dog();

        let removed = dog.remove_field("id").unwrap();
        assert_eq!(removed.name, "id");
        assert!(dog.primary_key.is_none());
        assert!(dog.remove_field("id").is_none());
    }
}

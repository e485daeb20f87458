//! Entity descriptors.

use super::field::FieldDescriptor;

/// A declared entity type: its name and fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityDescriptor {
    /// Entity name (unique among targets).
    pub name: String,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Create an entity with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that take part in migration.
    pub fn persistent_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_persistent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Primitive;

    #[test]
    fn test_entity_builder() {
        let dog = EntityDescriptor::new("Dog")
            .with_field(FieldDescriptor::primitive("id", Primitive::I64).primary_key())
            .with_fields([
                FieldDescriptor::text("name").indexed(),
                FieldDescriptor::text("nickname").ignore(),
            ]);

        assert_eq!(dog.name, "Dog");
        assert_eq!(dog.fields.len(), 3);
        assert!(dog.get_field("id").unwrap().wants_primary_key());
        assert!(dog.get_field("missing").is_none());
        assert_eq!(dog.persistent_fields().count(), 2);
    }
}

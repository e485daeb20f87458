//! The structural editing surface the synchronizers drive.
//!
//! Anything that can enumerate and mutate a stored schema implements
//! [`SchemaEditor`]. The engine never touches row data, so the trait only
//! exposes entity and field shapes.

use crate::catalog::{ScalarType, StoredField};
use crate::error::Error;

/// Read and mutate the shape of a stored schema.
pub trait SchemaEditor {
    /// Names of all stored entities.
    fn entity_names(&self) -> Vec<String>;

    /// Check if an entity exists. Used to resolve relationship targets.
    fn has_entity(&self, entity: &str) -> bool;

    /// Create an entity with no fields.
    fn create_entity(&mut self, entity: &str) -> Result<(), Error>;

    /// Remove an entity and all of its fields.
    fn remove_entity(&mut self, entity: &str) -> Result<(), Error>;

    /// Names of the stored fields of an entity, in creation order.
    fn field_names(&self, entity: &str) -> Result<Vec<String>, Error>;

    /// Read a stored field.
    fn field(&self, entity: &str, field: &str) -> Result<&StoredField, Error>;

    /// Check if a field exists on an entity.
    fn has_field(&self, entity: &str, field: &str) -> Result<bool, Error> {
        Ok(self.field_names(entity)?.iter().any(|name| name == field))
    }

    /// Add a scalar field.
    fn add_field(
        &mut self,
        entity: &str,
        field: &str,
        scalar: ScalarType,
        nullable: bool,
    ) -> Result<(), Error>;

    /// Add a to-one link to `target`.
    fn add_object_field(&mut self, entity: &str, field: &str, target: &str) -> Result<(), Error>;

    /// Add a to-many link to `target`.
    fn add_list_field(&mut self, entity: &str, field: &str, target: &str) -> Result<(), Error>;

    /// Remove a field.
    fn remove_field(&mut self, entity: &str, field: &str) -> Result<(), Error>;

    /// Add a search index to a scalar field.
    fn add_index(&mut self, entity: &str, field: &str) -> Result<(), Error>;

    /// Remove the search index from a scalar field.
    fn remove_index(&mut self, entity: &str, field: &str) -> Result<(), Error>;

    /// Set whether a scalar field accepts null.
    fn set_nullable(&mut self, entity: &str, field: &str, nullable: bool) -> Result<(), Error>;

    /// The primary key field of an entity, if any.
    fn primary_key(&self, entity: &str) -> Result<Option<String>, Error>;

    /// Make a scalar field the primary key. The field becomes indexed.
    fn set_primary_key(&mut self, entity: &str, field: &str) -> Result<(), Error>;

    /// Clear the primary key of an entity.
    fn clear_primary_key(&mut self, entity: &str) -> Result<(), Error>;
}

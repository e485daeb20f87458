//! Stored schema - versioned snapshot of every stored entity shape.

use super::{ScalarType, StoredEntity, StoredField};
use crate::error::Error;
use crate::migration::SchemaEditor;
use rkyv::{Archive, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// A versioned snapshot of the stored schema.
///
/// Entities are keyed by name in sorted order so that every walk over the
/// schema is deterministic.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct StoredSchema {
    /// Schema version (monotonically increasing).
    pub version: u64,
    /// Creation timestamp (microseconds since Unix epoch).
    pub created_at: u64,
    /// Entity shapes keyed by name.
    pub entities: BTreeMap<String, StoredEntity>,
}

pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}

impl StoredSchema {
    /// Create an empty stored schema.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            created_at: current_timestamp(),
            entities: BTreeMap::new(),
        }
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: StoredEntity) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&StoredEntity> {
        self.entities.get(name)
    }

    /// List all entity names in sorted order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|s| s.as_str()).collect()
    }

    /// Serialize the schema to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a schema from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    fn entity(&self, entity: &str) -> Result<&StoredEntity, Error> {
        self.entities
            .get(entity)
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    fn entity_mut(&mut self, entity: &str) -> Result<&mut StoredEntity, Error> {
        self.entities
            .get_mut(entity)
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    fn insert_field(&mut self, entity: &str, field: StoredField) -> Result<(), Error> {
        let stored = self.entity_mut(entity)?;
        if stored.has_field(&field.name) {
            return Err(Error::FieldExists {
                entity: entity.to_string(),
                field: field.name,
            });
        }
        stored.fields.push(field);
        Ok(())
    }

    fn scalar_field_mut(
        &mut self,
        entity: &str,
        field: &str,
        attribute: &'static str,
    ) -> Result<&mut StoredField, Error> {
        let stored = self
            .entity_mut(entity)?
            .get_field_mut(field)
            .ok_or_else(|| Error::FieldNotFound {
                entity: entity.to_string(),
                field: field.to_string(),
            })?;
        if stored.is_relationship() {
            return Err(Error::NotScalar {
                entity: entity.to_string(),
                field: field.to_string(),
                attribute,
            });
        }
        Ok(stored)
    }
}

impl Default for StoredSchema {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SchemaEditor for StoredSchema {
    fn entity_names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    fn has_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    fn create_entity(&mut self, entity: &str) -> Result<(), Error> {
        if self.entities.contains_key(entity) {
            return Err(Error::EntityExists(entity.to_string()));
        }
        self.entities
            .insert(entity.to_string(), StoredEntity::new(entity));
        Ok(())
    }

    fn remove_entity(&mut self, entity: &str) -> Result<(), Error> {
        self.entities
            .remove(entity)
            .map(|_| ())
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    fn field_names(&self, entity: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .entity(entity)?
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect())
    }

    fn field(&self, entity: &str, field: &str) -> Result<&StoredField, Error> {
        self.entity(entity)?
            .get_field(field)
            .ok_or_else(|| Error::FieldNotFound {
                entity: entity.to_string(),
                field: field.to_string(),
            })
    }

    fn has_field(&self, entity: &str, field: &str) -> Result<bool, Error> {
        Ok(self.entity(entity)?.has_field(field))
    }

    fn add_field(
        &mut self,
        entity: &str,
        field: &str,
        scalar: ScalarType,
        nullable: bool,
    ) -> Result<(), Error> {
        self.insert_field(entity, StoredField::scalar(field, scalar, nullable))
    }

    fn add_object_field(&mut self, entity: &str, field: &str, target: &str) -> Result<(), Error> {
        if !self.has_entity(target) {
            return Err(Error::EntityNotFound(target.to_string()));
        }
        self.insert_field(entity, StoredField::object(field, target))
    }

    fn add_list_field(&mut self, entity: &str, field: &str, target: &str) -> Result<(), Error> {
        if !self.has_entity(target) {
            return Err(Error::EntityNotFound(target.to_string()));
        }
        self.insert_field(entity, StoredField::list(field, target))
    }

    fn remove_field(&mut self, entity: &str, field: &str) -> Result<(), Error> {
        self.entity_mut(entity)?
            .remove_field(field)
            .map(|_| ())
            .ok_or_else(|| Error::FieldNotFound {
                entity: entity.to_string(),
                field: field.to_string(),
            })
    }

    fn add_index(&mut self, entity: &str, field: &str) -> Result<(), Error> {
        self.scalar_field_mut(entity, field, "index")?.indexed = true;
        Ok(())
    }

    fn remove_index(&mut self, entity: &str, field: &str) -> Result<(), Error> {
        if self.entity(entity)?.is_primary_key(field) {
            return Err(Error::PrimaryKeyIndex {
                entity: entity.to_string(),
                field: field.to_string(),
            });
        }
        self.scalar_field_mut(entity, field, "index")?.indexed = false;
        Ok(())
    }

    fn set_nullable(&mut self, entity: &str, field: &str, nullable: bool) -> Result<(), Error> {
        self.scalar_field_mut(entity, field, "nullability")?.nullable = nullable;
        Ok(())
    }

    fn primary_key(&self, entity: &str) -> Result<Option<String>, Error> {
        Ok(self.entity(entity)?.primary_key.clone())
    }

    fn set_primary_key(&mut self, entity: &str, field: &str) -> Result<(), Error> {
        self.scalar_field_mut(entity, field, "primary key")?.indexed = true;
        self.entity_mut(entity)?.primary_key = Some(field.to_string());
        Ok(())
    }

    fn clear_primary_key(&mut self, entity: &str) -> Result<(), Error> {
        self.entity_mut(entity)?.primary_key = None;
        Ok(())
    }
}

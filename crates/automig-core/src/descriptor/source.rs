//! Sources of target entity descriptors.

use super::entity::EntityDescriptor;
use crate::error::Error;
use std::collections::BTreeMap;
use std::path::Path;

/// Anything that can list the entity types the stored schema should match.
pub trait DescriptorSource {
    /// One descriptor per declared entity type.
    fn target_entities(&self) -> Vec<EntityDescriptor>;
}

/// A type that describes itself as an entity.
pub trait Model {
    /// The descriptor for this entity type.
    fn descriptor() -> EntityDescriptor;
}

/// Explicitly registered target entities, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSet {
    entities: BTreeMap<String, EntityDescriptor>,
}

impl ModelSet {
    /// Create an empty model set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model type.
    pub fn register<M: Model>(mut self) -> Self {
        self.insert(M::descriptor());
        self
    }

    /// Add a descriptor, replacing any earlier one with the same name.
    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.insert(entity);
        self
    }

    /// Add a descriptor, replacing any earlier one with the same name.
    pub fn insert(&mut self, entity: EntityDescriptor) {
        self.entities.insert(entity.name.clone(), entity);
    }

    /// Get a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Parse a JSON array of entity descriptors.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let entities: Vec<EntityDescriptor> = serde_json::from_str(json)?;
        Ok(entities.into_iter().collect())
    }

    /// Read a JSON array of entity descriptors from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl FromIterator<EntityDescriptor> for ModelSet {
    fn from_iter<I: IntoIterator<Item = EntityDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        for entity in iter {
            set.insert(entity);
        }
        set
    }
}

impl DescriptorSource for ModelSet {
    fn target_entities(&self) -> Vec<EntityDescriptor> {
        self.entities.values().cloned().collect()
    }
}

impl DescriptorSource for [EntityDescriptor] {
    fn target_entities(&self) -> Vec<EntityDescriptor> {
        self.to_vec()
    }
}

impl DescriptorSource for Vec<EntityDescriptor> {
    fn target_entities(&self) -> Vec<EntityDescriptor> {
        self.clone()
    }
}

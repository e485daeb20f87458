//! Structural edits recorded while synchronizing.

use crate::catalog::StoredType;

/// A single structural edit applied to the stored schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum SchemaEdit {
    /// Entity was created with no fields.
    CreateEntity {
        /// Name of the entity.
        entity: String,
    },
    /// Entity was dropped together with its fields.
    DropEntity {
        /// Name of the entity.
        entity: String,
    },
    /// Field was added.
    AddField {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
        /// Structural type of the new field.
        stored_type: StoredType,
        /// Nullability at creation.
        nullable: bool,
    },
    /// Field was removed.
    RemoveField {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
    },
    /// Search index was added.
    AddIndex {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
    },
    /// Search index was removed.
    RemoveIndex {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
    },
    /// Field nullability was changed.
    SetNullable {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
        /// New nullability.
        nullable: bool,
    },
    /// Field was promoted to primary key.
    SetPrimaryKey {
        /// Owning entity.
        entity: String,
        /// Name of the field.
        field: String,
    },
    /// Primary key was cleared from a field.
    ClearPrimaryKey {
        /// Owning entity.
        entity: String,
        /// Name of the former key field.
        field: String,
    },
}

impl SchemaEdit {
    /// Get the entity name for this edit.
    pub fn entity_name(&self) -> &str {
        match self {
            SchemaEdit::CreateEntity { entity }
            | SchemaEdit::DropEntity { entity }
            | SchemaEdit::AddField { entity, .. }
            | SchemaEdit::RemoveField { entity, .. }
            | SchemaEdit::AddIndex { entity, .. }
            | SchemaEdit::RemoveIndex { entity, .. }
            | SchemaEdit::SetNullable { entity, .. }
            | SchemaEdit::SetPrimaryKey { entity, .. }
            | SchemaEdit::ClearPrimaryKey { entity, .. } => entity,
        }
    }

    /// Get the field name for field-level edits.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            SchemaEdit::CreateEntity { .. } | SchemaEdit::DropEntity { .. } => None,
            SchemaEdit::AddField { field, .. }
            | SchemaEdit::RemoveField { field, .. }
            | SchemaEdit::AddIndex { field, .. }
            | SchemaEdit::RemoveIndex { field, .. }
            | SchemaEdit::SetNullable { field, .. }
            | SchemaEdit::SetPrimaryKey { field, .. }
            | SchemaEdit::ClearPrimaryKey { field, .. } => Some(field),
        }
    }

    /// Check if this edit discards stored data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            SchemaEdit::DropEntity { .. } | SchemaEdit::RemoveField { .. }
        )
    }
}

impl std::fmt::Display for SchemaEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaEdit::CreateEntity { entity } => write!(f, "create entity {entity}"),
            SchemaEdit::DropEntity { entity } => write!(f, "drop entity {entity}"),
            SchemaEdit::AddField {
                entity,
                field,
                stored_type,
                nullable,
            } => {
                let null = if *nullable { "nullable" } else { "not null" };
                write!(f, "add field {entity}.{field} {stored_type} ({null})")
            }
            SchemaEdit::RemoveField { entity, field } => {
                write!(f, "remove field {entity}.{field}")
            }
            SchemaEdit::AddIndex { entity, field } => write!(f, "add index {entity}.{field}"),
            SchemaEdit::RemoveIndex { entity, field } => {
                write!(f, "remove index {entity}.{field}")
            }
            SchemaEdit::SetNullable {
                entity,
                field,
                nullable,
            } => write!(f, "set {entity}.{field} nullable={nullable}"),
            SchemaEdit::SetPrimaryKey { entity, field } => {
                write!(f, "set primary key {entity}.{field}")
            }
            SchemaEdit::ClearPrimaryKey { entity, field } => {
                write!(f, "clear primary key {entity}.{field}")
            }
        }
    }
}

/// Edits applied by one synchronization run, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncReport {
    /// Applied edits.
    pub edits: Vec<SchemaEdit>,
}

impl SyncReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied edit.
    pub(crate) fn push(&mut self, edit: SchemaEdit) {
        self.edits.push(edit);
    }

    /// Check if nothing was changed.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Get the total number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Check if any edit discards stored data.
    pub fn has_destructive_edits(&self) -> bool {
        self.edits.iter().any(SchemaEdit::is_destructive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;

    #[test]
    fn test_edit_accessors() {
        let edit = SchemaEdit::AddField {
            entity: "Dog".into(),
            field: "name".into(),
            stored_type: StoredType::scalar(ScalarType::String),
            nullable: true,
        };
        assert_eq!(edit.entity_name(), "Dog");
        assert_eq!(edit.field_name(), Some("name"));
        assert!(!edit.is_destructive());

        let drop = SchemaEdit::DropEntity {
            entity: "Bird".into(),
        };
        assert_eq!(drop.field_name(), None);
        assert!(drop.is_destructive());
    }

    #[test]
    fn test_edit_display() {
        let edit = SchemaEdit::AddField {
            entity: "Dog".into(),
            field: "cat".into(),
            stored_type: StoredType::object("Cat"),
            nullable: true,
        };
        assert_eq!(edit.to_string(), "add field Dog.cat -> Cat (nullable)");

        let pk = SchemaEdit::SetPrimaryKey {
            entity: "Dog".into(),
            field: "id".into(),
        };
        assert_eq!(pk.to_string(), "set primary key Dog.id");
    }

    #[test]
    fn test_report_filters() {
        let mut report = SyncReport::new();
        report.push(SchemaEdit::CreateEntity {
            entity: "Dog".into(),
        });
        report.push(SchemaEdit::RemoveField {
            entity: "Cat".into(),
            field: "age".into(),
        });

        assert_eq!(report.len(), 2);
        assert_eq!(report.edits[1].entity_name(), "Cat");
        assert!(report.has_destructive_edits());
    }
}

//! Migration-specific error types.

use thiserror::Error;

/// Migration errors. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A list field cannot be added without naming its linked entity.
    #[error("list field {entity}.{field} cannot be added without a link annotation")]
    MissingLinkAnnotation {
        /// Owning entity.
        entity: String,
        /// List field.
        field: String,
    },

    /// A relationship field points at an entity that is not stored.
    #[error("entity {target} linked by {entity}.{field} was not found in the stored schema")]
    UnresolvedRelationshipTarget {
        /// Owning entity.
        entity: String,
        /// Relationship field.
        field: String,
        /// Missing linked entity.
        target: String,
    },

    /// An entity would end up with a second primary key.
    #[error("multiple primary keys are not supported: {entity}.{field} (already {existing})")]
    MultiplePrimaryKeys {
        /// Owning entity.
        entity: String,
        /// Field that asked for the primary key.
        field: String,
        /// Current primary key field.
        existing: String,
    },

    /// Dropping an entity would leave a link pointing at nothing.
    #[error("dropping {target} would leave {entity}.{field} dangling")]
    DanglingLink {
        /// Entity holding the link.
        entity: String,
        /// Link field.
        field: String,
        /// Entity being dropped.
        target: String,
    },

    /// Storage or session error, surfaced unchanged.
    #[error(transparent)]
    Storage(#[from] crate::error::Error),
}

impl MigrationError {
    /// Name of the entity the failure is about, when it concerns one.
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            MigrationError::MissingLinkAnnotation { entity, .. }
            | MigrationError::UnresolvedRelationshipTarget { entity, .. }
            | MigrationError::MultiplePrimaryKeys { entity, .. }
            | MigrationError::DanglingLink { entity, .. } => Some(entity),
            MigrationError::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_error_display() {
        let err = MigrationError::MissingLinkAnnotation {
            entity: "Dog".to_string(),
            field: "phoneNumbers".to_string(),
        };
        assert!(err.to_string().contains("Dog.phoneNumbers"));

        let err = MigrationError::MultiplePrimaryKeys {
            entity: "Dog".to_string(),
            field: "code".to_string(),
            existing: "id".to_string(),
        };
        assert!(err.to_string().contains("Dog.code"));
        assert_eq!(err.entity_name(), Some("Dog"));
    }

    #[test]
    fn test_session_errors_pass_through() {
        let err = MigrationError::from(Error::NoOpenInstance);
        assert_eq!(err.to_string(), Error::NoOpenInstance.to_string());
        assert!(matches!(
            err,
            MigrationError::Storage(Error::NoOpenInstance)
        ));
        assert_eq!(err.entity_name(), None);
    }
}

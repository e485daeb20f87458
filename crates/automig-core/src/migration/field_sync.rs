//! Per-entity field reconciliation.
//!
//! Brings the stored fields of one entity in line with its descriptor:
//! stale fields are removed, missing fields are added, and the index,
//! nullability and primary key state of value fields is reconciled.

use super::classify::{classify, FieldKind};
use super::edit::{SchemaEdit, SyncReport};
use super::editor::SchemaEditor;
use super::error::MigrationError;
use crate::catalog::StoredType;
use crate::descriptor::{EntityDescriptor, FieldAttributes, FieldDescriptor};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A persistent descriptor field paired with its classification.
struct TargetField<'a> {
    descriptor: &'a FieldDescriptor,
    kind: FieldKind,
}

impl TargetField<'_> {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn link(&self) -> Option<&str> {
        self.descriptor.link.as_deref()
    }

    fn attributes(&self) -> Option<FieldAttributes> {
        self.descriptor.attributes
    }
}

/// Reconcile the stored fields of `entity` with its descriptor.
///
/// The entity must already exist in `schema`. Every relationship target
/// must exist as well by the time its field is added.
#[instrument(skip_all, fields(entity = %entity.name))]
pub fn synchronize_fields<E>(
    entity: &EntityDescriptor,
    schema: &mut E,
    report: &mut SyncReport,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let targets: Vec<TargetField<'_>> = entity
        .persistent_fields()
        .map(|descriptor| TargetField {
            descriptor,
            kind: classify(&descriptor.declared_type),
        })
        .collect();

    remove_stale_fields(&entity.name, &targets, schema, report)?;

    for target in targets.iter().filter(|t| !t.kind.is_ignored()) {
        if !schema.has_field(&entity.name, target.name())? {
            add_field(&entity.name, target, schema, report)?;
        }
    }

    reconcile_attributes(&entity.name, &targets, schema, report)
}

/// Remove stored fields that are gone from the descriptor or whose stored
/// type no longer matches. Stored fields sharing a name with a computed
/// descriptor field are left alone.
fn remove_stale_fields<E>(
    entity: &str,
    targets: &[TargetField<'_>],
    schema: &mut E,
    report: &mut SyncReport,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let wanted: HashSet<&str> = targets
        .iter()
        .filter(|t| !t.kind.is_ignored())
        .map(|t| t.name())
        .collect();
    let computed: HashSet<&str> = targets
        .iter()
        .filter(|t| t.kind.is_computed())
        .map(|t| t.name())
        .collect();

    for field in schema.field_names(entity)? {
        if computed.contains(field.as_str()) {
            continue;
        }

        let keep = wanted.contains(field.as_str()) && {
            let target = targets
                .iter()
                .find(|t| t.name() == field)
                .map(|t| t.kind.stored_type(t.link()));
            let stored_type = &schema.field(entity, &field)?.stored_type;
            match target.flatten() {
                Some(expected) => *stored_type == expected,
                // A list without a link keeps whatever list is stored.
                None => matches!(stored_type, StoredType::List { .. }),
            }
        };

        if !keep {
            schema.remove_field(entity, &field)?;
            debug!(field = %field, "removed field");
            report.push(SchemaEdit::RemoveField {
                entity: entity.to_string(),
                field,
            });
        }
    }

    Ok(())
}

fn add_field<E>(
    entity: &str,
    target: &TargetField<'_>,
    schema: &mut E,
    report: &mut SyncReport,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let field = target.name();

    let stored_type = match &target.kind {
        FieldKind::NonNullPrimitive(scalar)
        | FieldKind::NullableWrapper(scalar)
        | FieldKind::SimpleValue(scalar) => {
            let nullable = target.kind.nullable_on_create();
            schema.add_field(entity, field, *scalar, nullable)?;
            target.kind.stored_type(None)
        }
        FieldKind::ToMany => {
            let linked = target
                .link()
                .ok_or_else(|| MigrationError::MissingLinkAnnotation {
                    entity: entity.to_string(),
                    field: field.to_string(),
                })?;
            resolve_target(entity, field, linked, schema)?;
            schema.add_list_field(entity, field, linked)?;
            target.kind.stored_type(Some(linked))
        }
        FieldKind::ToOne { entity: declared } => {
            let linked = target.link().unwrap_or(declared);
            resolve_target(entity, field, linked, schema)?;
            schema.add_object_field(entity, field, linked)?;
            target.kind.stored_type(Some(linked))
        }
        FieldKind::Ignored(_) => return Ok(()),
    };

    // Every arm above that reaches here produced a stored type.
    if let Some(stored_type) = stored_type {
        let nullable = schema.field(entity, field)?.nullable;
        debug!(field, %stored_type, nullable, "added field");
        report.push(SchemaEdit::AddField {
            entity: entity.to_string(),
            field: field.to_string(),
            stored_type,
            nullable,
        });
    }

    Ok(())
}

fn resolve_target<E>(
    entity: &str,
    field: &str,
    linked: &str,
    schema: &E,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    if schema.has_entity(linked) {
        Ok(())
    } else {
        Err(MigrationError::UnresolvedRelationshipTarget {
            entity: entity.to_string(),
            field: field.to_string(),
            target: linked.to_string(),
        })
    }
}

/// Reconcile index, nullability and primary key state of value fields.
///
/// Demotions run for the whole entity before any promotion, so moving the
/// primary key from one field to another converges in a single run.
fn reconcile_attributes<E>(
    entity: &str,
    targets: &[TargetField<'_>],
    schema: &mut E,
    report: &mut SyncReport,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let scalars: Vec<&TargetField<'_>> = targets.iter().filter(|t| t.kind.is_scalar()).collect();

    for target in &scalars {
        let field = target.name();

        if let Some(attributes) = target.attributes() {
            if !attributes.primary_key
                && schema.primary_key(entity)?.as_deref() == Some(field)
            {
                schema.clear_primary_key(entity)?;
                debug!(field, "cleared primary key");
                report.push(SchemaEdit::ClearPrimaryKey {
                    entity: entity.to_string(),
                    field: field.to_string(),
                });
            }

            let indexed = schema.field(entity, field)?.indexed;
            if attributes.wants_index() && !indexed {
                schema.add_index(entity, field)?;
                debug!(field, "added index");
                report.push(SchemaEdit::AddIndex {
                    entity: entity.to_string(),
                    field: field.to_string(),
                });
            } else if !attributes.wants_index() && indexed {
                schema.remove_index(entity, field)?;
                debug!(field, "removed index");
                report.push(SchemaEdit::RemoveIndex {
                    entity: entity.to_string(),
                    field: field.to_string(),
                });
            }
        }

        // Non-null primitives are never nullable, attributes or not.
        let nullable = match (&target.kind, target.attributes()) {
            (FieldKind::NonNullPrimitive(_), _) => Some(false),
            (_, Some(attributes)) => Some(!attributes.required),
            (_, None) => None,
        };
        if let Some(nullable) = nullable {
            if schema.field(entity, field)?.nullable != nullable {
                schema.set_nullable(entity, field, nullable)?;
                debug!(field, nullable, "changed nullability");
                report.push(SchemaEdit::SetNullable {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    nullable,
                });
            }
        }
    }

    for target in scalars.iter().filter(|t| t.descriptor.wants_primary_key()) {
        let field = target.name();
        match schema.primary_key(entity)? {
            Some(existing) if existing == field => {}
            Some(existing) => {
                return Err(MigrationError::MultiplePrimaryKeys {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    existing,
                });
            }
            None => {
                schema.set_primary_key(entity, field)?;
                debug!(field, "set primary key");
                report.push(SchemaEdit::SetPrimaryKey {
                    entity: entity.to_string(),
                    field: field.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ScalarType, StoredEntity, StoredField, StoredSchema, StoredType};
    use crate::descriptor::Primitive;

    fn sync(entity: &EntityDescriptor, schema: &mut StoredSchema) -> Result<SyncReport, MigrationError> {
        let mut report = SyncReport::new();
        synchronize_fields(entity, schema, &mut report)?;
        Ok(report)
    }

    fn cat_schema() -> StoredSchema {
        StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("name", ScalarType::String, true)),
        )
    }

    fn stored_field<'a>(schema: &'a StoredSchema, entity: &str, field: &str) -> &'a StoredField {
        schema.get_entity(entity).unwrap().get_field(field).unwrap()
    }

    #[test]
    fn test_adds_missing_value_fields() {
        let mut schema = cat_schema();
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::text("name"))
            .with_field(FieldDescriptor::primitive("age", Primitive::I32))
            .with_field(FieldDescriptor::nullable("weight", Primitive::F64))
            .with_field(FieldDescriptor::timestamp("born"))
            .with_field(FieldDescriptor::bytes("photo"));

        let report = sync(&cat, &mut schema).unwrap();

        assert_eq!(report.len(), 4);
        assert!(!stored_field(&schema, "Cat", "age").nullable);
        assert!(stored_field(&schema, "Cat", "weight").nullable);
        assert_eq!(
            stored_field(&schema, "Cat", "born").stored_type,
            StoredType::scalar(ScalarType::Timestamp)
        );
        assert!(stored_field(&schema, "Cat", "photo").nullable);
    }

    #[test]
    fn test_removes_stale_fields() {
        let mut schema = cat_schema();
        let cat = EntityDescriptor::new("Cat");

        let report = sync(&cat, &mut schema).unwrap();

        assert_eq!(
            report.edits,
            vec![SchemaEdit::RemoveField {
                entity: "Cat".into(),
                field: "name".into(),
            }]
        );
        assert!(schema.get_entity("Cat").unwrap().fields.is_empty());
    }

    #[test]
    fn test_excluded_fields_are_removed_and_never_added() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("name", ScalarType::String, true))
                .with_field(StoredField::scalar("cache", ScalarType::String, true)),
        );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::text("name"))
            .with_field(FieldDescriptor::text("cache").ignore())
            .with_field(FieldDescriptor::primitive("COUNT", Primitive::I32).as_static())
            .with_field(FieldDescriptor::text("scratch").as_transient())
            .with_field(FieldDescriptor::new(
                "timer",
                crate::descriptor::DeclaredType::Other("Duration".into()),
            ));

        sync(&cat, &mut schema).unwrap();

        assert_eq!(
            schema.get_entity("Cat").unwrap().field_names(),
            vec!["name"]
        );
    }

    #[test]
    fn test_computed_fields_are_never_touched() {
        let mut schema = StoredSchema::new(1)
            .with_entity(StoredEntity::new("Dog"))
            .with_entity(
                StoredEntity::new("Cat").with_field(StoredField::list("owners", "Dog")),
            );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::backlinks("owners", "Dog"))
            .with_field(FieldDescriptor::backlinks("friends", "Dog"));

        let report = sync(&cat, &mut schema).unwrap();

        assert!(report.is_empty());
        assert_eq!(
            schema.get_entity("Cat").unwrap().field_names(),
            vec!["owners"]
        );
    }

    #[test]
    fn test_type_change_is_remove_then_add() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("age", ScalarType::String, true)),
        );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("age", Primitive::I32));

        let report = sync(&cat, &mut schema).unwrap();

        assert!(matches!(report.edits[0], SchemaEdit::RemoveField { .. }));
        assert!(matches!(report.edits[1], SchemaEdit::AddField { .. }));
        assert_eq!(
            stored_field(&schema, "Cat", "age").stored_type,
            StoredType::scalar(ScalarType::Int32)
        );
    }

    #[test]
    fn test_wrapper_to_primitive_keeps_field_and_forces_non_null() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("age", ScalarType::Int32, true)),
        );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("age", Primitive::I32));

        let report = sync(&cat, &mut schema).unwrap();

        assert_eq!(
            report.edits,
            vec![SchemaEdit::SetNullable {
                entity: "Cat".into(),
                field: "age".into(),
                nullable: false,
            }]
        );
    }

    #[test]
    fn test_primitive_ignores_required_flag() {
        let mut schema = StoredSchema::new(1).with_entity(StoredEntity::new("Cat"));
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("lives", Primitive::I8).indexed());

        sync(&cat, &mut schema).unwrap();

        let lives = stored_field(&schema, "Cat", "lives");
        assert!(!lives.nullable);
        assert!(lives.indexed);
    }

    #[test]
    fn test_to_many_requires_link() {
        let mut schema = cat_schema();
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::text("name"))
            .with_field(FieldDescriptor::list("friends"));

        let err = sync(&cat, &mut schema).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::MissingLinkAnnotation { ref field, .. } if field == "friends"
        ));
        assert!(!schema.get_entity("Cat").unwrap().has_field("friends"));
    }

    #[test]
    fn test_stored_list_without_link_is_kept() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat").with_field(StoredField::list("friends", "Cat")),
        );
        let cat = EntityDescriptor::new("Cat").with_field(FieldDescriptor::list("friends"));

        let report = sync(&cat, &mut schema).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_stored_value_replaced_by_unlinked_list_fails() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Dog")
                .with_field(StoredField::scalar("phoneNumbers", ScalarType::String, true)),
        );
        let dog = EntityDescriptor::new("Dog").with_field(FieldDescriptor::list("phoneNumbers"));

        let err = sync(&dog, &mut schema).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::MissingLinkAnnotation { ref field, .. } if field == "phoneNumbers"
        ));
        assert!(!schema.get_entity("Dog").unwrap().has_field("phoneNumbers"));
    }

    #[test]
    fn test_unresolved_target() {
        let mut schema = cat_schema();
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::text("name"))
            .with_field(FieldDescriptor::entity("owner", "Person"));

        let err = sync(&cat, &mut schema).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::UnresolvedRelationshipTarget { ref target, .. } if target == "Person"
        ));
    }

    #[test]
    fn test_link_annotation_overrides_declared_entity() {
        let mut schema = StoredSchema::new(1)
            .with_entity(StoredEntity::new("Cat"))
            .with_entity(StoredEntity::new("Kitten"));
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::entity("young", "Animal").linked_to("Kitten"));

        sync(&cat, &mut schema).unwrap();

        assert_eq!(
            stored_field(&schema, "Cat", "young").stored_type,
            StoredType::object("Kitten")
        );
    }

    #[test]
    fn test_absent_attributes_leave_state_alone() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("name", ScalarType::String, false).with_index()),
        );
        let cat = EntityDescriptor::new("Cat").with_field(FieldDescriptor::text("name"));

        let report = sync(&cat, &mut schema).unwrap();

        assert!(report.is_empty());
        let name = stored_field(&schema, "Cat", "name");
        assert!(name.indexed);
        assert!(!name.nullable);
    }

    #[test]
    fn test_empty_attributes_clear_stale_state() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("name", ScalarType::String, false).with_index()),
        );
        let cat = EntityDescriptor::new("Cat").with_field(
            FieldDescriptor::text("name").with_attributes(FieldAttributes::new()),
        );

        let report = sync(&cat, &mut schema).unwrap();

        assert_eq!(report.len(), 2);
        let name = stored_field(&schema, "Cat", "name");
        assert!(!name.indexed);
        assert!(name.nullable);
    }

    #[test]
    fn test_primary_key_is_indexed() {
        let mut schema = StoredSchema::new(1).with_entity(StoredEntity::new("Cat"));
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("id", Primitive::I64).primary_key());

        sync(&cat, &mut schema).unwrap();

        let stored = schema.get_entity("Cat").unwrap();
        assert!(stored.is_primary_key("id"));
        assert!(stored.get_field("id").unwrap().indexed);
    }

    #[test]
    fn test_two_primary_keys_fail() {
        let mut schema = StoredSchema::new(1).with_entity(StoredEntity::new("Cat"));
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("id", Primitive::I64).primary_key())
            .with_field(FieldDescriptor::text("code").primary_key());

        let err = sync(&cat, &mut schema).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::MultiplePrimaryKeys { ref field, ref existing, .. }
                if field == "code" && existing == "id"
        ));
    }

    #[test]
    fn test_primary_key_moves_between_fields() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("code", ScalarType::String, true))
                .with_field(StoredField::scalar("id", ScalarType::Int64, false))
                .with_primary_key("id"),
        );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::text("code").primary_key())
            .with_field(FieldDescriptor::primitive("id", Primitive::I64).with_attributes(FieldAttributes::new()));

        sync(&cat, &mut schema).unwrap();

        let stored = schema.get_entity("Cat").unwrap();
        assert!(stored.is_primary_key("code"));
        assert!(!stored.get_field("id").unwrap().indexed);
    }

    #[test]
    fn test_stale_primary_key_without_attributes_blocks_promotion() {
        let mut schema = StoredSchema::new(1).with_entity(
            StoredEntity::new("Cat")
                .with_field(StoredField::scalar("id", ScalarType::Int64, false))
                .with_primary_key("id"),
        );
        let cat = EntityDescriptor::new("Cat")
            .with_field(FieldDescriptor::primitive("id", Primitive::I64))
            .with_field(FieldDescriptor::text("code").primary_key());

        let err = sync(&cat, &mut schema).unwrap_err();
        assert!(matches!(err, MigrationError::MultiplePrimaryKeys { .. }));
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut schema = StoredSchema::new(1)
            .with_entity(StoredEntity::new("Cat"))
            .with_entity(StoredEntity::new("Dog"));
        let dog = EntityDescriptor::new("Dog")
            .with_field(FieldDescriptor::primitive("id", Primitive::I64).primary_key())
            .with_field(FieldDescriptor::text("name").indexed().required())
            .with_field(FieldDescriptor::entity("cat", "Cat"))
            .with_field(FieldDescriptor::list("cats").linked_to("Cat"));

        let first = sync(&dog, &mut schema).unwrap();
        let second = sync(&dog, &mut schema).unwrap();

        assert!(!first.is_empty());
        assert!(second.is_empty());
    }
}

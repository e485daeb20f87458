//! Entity-level reconciliation.

use super::config::{DanglingLinkPolicy, MigrationConfig};
use super::edit::{SchemaEdit, SyncReport};
use super::editor::SchemaEditor;
use super::error::MigrationError;
use super::field_sync::synchronize_fields;
use crate::descriptor::EntityDescriptor;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

/// Reconcile `schema` with the target entities.
///
/// Missing entities are created empty before any field is touched, so a
/// relationship between two new entities always resolves. Entities that are
/// no longer targeted are dropped next, then kept entities and finally the
/// created ones have their fields reconciled, each group in name order.
///
/// Any error aborts the run with `schema` partially edited. Callers that need
/// all-or-nothing behavior run against a copy, as the catalog does.
#[instrument(skip_all, fields(targets = targets.len()))]
pub fn synchronize<E>(
    targets: &[EntityDescriptor],
    schema: &mut E,
    config: &MigrationConfig,
) -> Result<SyncReport, MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let mut report = SyncReport::new();

    // A later descriptor with the same name replaces an earlier one.
    let targets: BTreeMap<&str, &EntityDescriptor> = targets
        .iter()
        .map(|entity| (entity.name.as_str(), entity))
        .collect();
    let stored: BTreeSet<String> = schema.entity_names().into_iter().collect();

    let created: Vec<&str> = targets
        .keys()
        .copied()
        .filter(|name| !stored.contains(*name))
        .collect();
    for name in &created {
        schema.create_entity(name)?;
        info!(entity = %name, "created entity");
        report.push(SchemaEdit::CreateEntity {
            entity: name.to_string(),
        });
    }

    let dropped: BTreeSet<&str> = stored
        .iter()
        .map(String::as_str)
        .filter(|name| !targets.contains_key(name))
        .collect();
    for name in &dropped {
        unlink_dropped(name, &dropped, schema, config.dangling_links, &mut report)?;
        schema.remove_entity(name)?;
        info!(entity = %name, "dropped entity");
        report.push(SchemaEdit::DropEntity {
            entity: name.to_string(),
        });
    }

    let kept = stored.iter().filter_map(|name| targets.get(name.as_str()));
    for entity in kept {
        synchronize_fields(entity, schema, &mut report)?;
    }

    for name in &created {
        if let Some(entity) = targets.get(name) {
            synchronize_fields(entity, schema, &mut report)?;
        }
    }

    Ok(report)
}

/// Handle link fields in surviving entities that point at `target`.
fn unlink_dropped<E>(
    target: &str,
    dropped: &BTreeSet<&str>,
    schema: &mut E,
    policy: DanglingLinkPolicy,
    report: &mut SyncReport,
) -> Result<(), MigrationError>
where
    E: SchemaEditor + ?Sized,
{
    let mut dangling = Vec::new();
    for entity in schema.entity_names() {
        if dropped.contains(entity.as_str()) {
            continue;
        }
        for field in schema.field_names(&entity)? {
            if schema.field(&entity, &field)?.links_to(target) {
                dangling.push((entity.clone(), field));
            }
        }
    }

    for (entity, field) in dangling {
        if policy == DanglingLinkPolicy::Fail {
            return Err(MigrationError::DanglingLink {
                entity,
                field,
                target: target.to_string(),
            });
        }

        schema.remove_field(&entity, &field)?;
        warn!(entity = %entity, field = %field, target, "removed link to dropped entity");
        report.push(SchemaEdit::RemoveField { entity, field });
    }

    Ok(())
}

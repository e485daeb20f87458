//! Migration entry point.

use super::config::MigrationConfig;
use super::edit::SyncReport;
use super::editor::SchemaEditor;
use super::error::MigrationError;
use super::schema_sync::synchronize;
use crate::descriptor::DescriptorSource;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Reconciles a stored schema with the entities declared in code.
///
/// Holds only configuration, so one value can drive any number of runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AutoMigration {
    config: MigrationConfig,
}

impl AutoMigration {
    /// Create an entry point with the given configuration.
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Bring `schema` in line with the entities of `source`, in place.
    ///
    /// Version numbers are logged but never inspected: the run always goes
    /// straight to the target shape however many versions were skipped.
    #[instrument(skip(self, schema, source))]
    pub fn migrate<E, S>(
        &self,
        old_version: u64,
        new_version: u64,
        schema: &mut E,
        source: &S,
    ) -> Result<SyncReport, MigrationError>
    where
        E: SchemaEditor + ?Sized,
        S: DescriptorSource + ?Sized,
    {
        let targets = source.target_entities();
        let report = synchronize(&targets, schema, &self.config).map_err(|err| {
            warn!(
                old_version,
                entity = err.entity_name().unwrap_or("-"),
                error = %err,
                "schema migration aborted"
            );
            err
        })?;

        info!(
            old_version,
            new_version,
            edits = report.len(),
            destructive = report.has_destructive_edits(),
            "schema migration complete"
        );
        Ok(report)
    }
}

/// Result of a catalog migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    /// Catalog version the run started from.
    pub from_version: u64,
    /// Catalog version after the run. Equal to `from_version` when nothing
    /// was persisted.
    pub to_version: u64,
    /// Whether a new schema version was written.
    pub persisted: bool,
    /// Edits the run applied (or would apply, for a dry run).
    pub report: SyncReport,
}

//! Subcommand execution.

use crate::config::{migration_config, Command};
use crate::error::CliError;
use crate::formatter::Formatter;
use automig_core::descriptor::ModelSet;
use automig_core::session::Session;
use automig_core::Error;
use std::path::Path;
use tracing::info;

/// Run a subcommand against an open session and return its output.
pub fn execute(
    session: &Session,
    command: &Command,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    match command {
        Command::Migrate {
            models,
            dry_run,
            fail_on_dangling,
        } => migrate(session, models, *dry_run, *fail_on_dangling, formatter),
        Command::Show { schema_version } => show(session, *schema_version, formatter),
        Command::Versions => versions(session, formatter),
    }
}

fn migrate(
    session: &Session,
    models: &Path,
    dry_run: bool,
    fail_on_dangling: bool,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    let models = ModelSet::from_path(models)?;
    info!(entities = models.len(), "loaded entity descriptors");

    let config = migration_config(dry_run, fail_on_dangling);
    let outcome = session.auto_migrate(&models, &config)?;
    Ok(formatter.format_outcome(&outcome))
}

fn show(
    session: &Session,
    version: Option<u64>,
    formatter: &dyn Formatter,
) -> Result<String, CliError> {
    let catalog = session.catalog();
    let schema = match version {
        Some(version) => catalog
            .schema_at_version(version)?
            .ok_or(Error::VersionNotFound(version))?,
        None => catalog.current_schema().unwrap_or_default(),
    };
    Ok(formatter.format_schema(&schema))
}

fn versions(session: &Session, formatter: &dyn Formatter) -> Result<String, CliError> {
    let catalog = session.catalog();
    let versions = catalog.list_versions()?;
    Ok(formatter.format_versions(catalog.current_version(), &versions))
}

//! CLI error types.

use automig_core::migration::MigrationError;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Catalog, session or descriptor file error.
    #[error(transparent)]
    Core(#[from] automig_core::Error),

    /// Migration aborted.
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),
}

//! CLI configuration.

use crate::formatter::OutputFormat;
use automig_core::catalog::{CatalogConfig, DEFAULT_DATA_PATH};
use automig_core::migration::{DanglingLinkPolicy, MigrationConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog database to open.
    pub catalog: CatalogConfig,
    /// Output format.
    pub format: OutputFormat,
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "automig")]
#[command(version, about = "Reconcile a stored schema with declared entities", long_about = None)]
pub struct Args {
    /// Path to the catalog database directory.
    #[arg(short, long, default_value = DEFAULT_DATA_PATH, global = true)]
    pub data_path: PathBuf,

    /// Output format.
    #[arg(long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Migrate the stored schema to the entities in a descriptor file.
    Migrate {
        /// JSON file with an array of entity descriptors.
        #[arg(short, long)]
        models: PathBuf,

        /// Report the edits without persisting them.
        #[arg(long)]
        dry_run: bool,

        /// Fail instead of removing links to dropped entities.
        #[arg(long)]
        fail_on_dangling: bool,
    },

    /// Print the stored schema.
    Show {
        /// Schema version to print (defaults to the current one).
        #[arg(long = "version", value_name = "N")]
        schema_version: Option<u64>,
    },

    /// List persisted schema versions.
    Versions,
}

impl Args {
    /// Convert command-line arguments to CLI configuration.
    pub fn to_config(&self) -> CliConfig {
        CliConfig {
            catalog: CatalogConfig::new(&self.data_path),
            format: self.format,
        }
    }
}

/// Migration configuration for the `migrate` flags.
pub fn migration_config(dry_run: bool, fail_on_dangling: bool) -> MigrationConfig {
    let policy = if fail_on_dangling {
        DanglingLinkPolicy::Fail
    } else {
        DanglingLinkPolicy::Drop
    };
    MigrationConfig::new()
        .with_dangling_links(policy)
        .with_dry_run(dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_args() {
        let args = Args::try_parse_from([
            "automig",
            "--data-path",
            "/tmp/catalog",
            "migrate",
            "--models",
            "models.json",
            "--dry-run",
        ])
        .unwrap();

        let config = args.to_config();
        assert_eq!(config.catalog.path, PathBuf::from("/tmp/catalog"));
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(
            args.command,
            Command::Migrate {
                models: PathBuf::from("models.json"),
                dry_run: true,
                fail_on_dangling: false,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["automig", "show", "--version", "3", "--format", "json"]).unwrap();

        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(
            args.command,
            Command::Show {
                schema_version: Some(3)
            }
        );
    }

    #[test]
    fn test_migrate_requires_models() {
        assert!(Args::try_parse_from(["automig", "migrate"]).is_err());
    }

    #[test]
    fn test_migration_config() {
        let config = migration_config(false, true);
        assert_eq!(config.dangling_links, DanglingLinkPolicy::Fail);
        assert!(!config.dry_run);
        assert_eq!(migration_config(false, false), MigrationConfig::default());
    }
}

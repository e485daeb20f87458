//! automig command-line tool
//!
//! Migrates a sled-backed schema catalog to the entities described in a JSON
//! descriptor file and inspects the stored schema versions.

mod commands;
mod config;
mod error;
mod formatter;

use automig_core::session::SessionManager;
use clap::Parser;
use config::Args;
use error::CliError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automig=info,automig_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = args.to_config();
    tracing::debug!(
        data_path = %config.catalog.path.display(),
        format = %config.format,
        "configuration loaded"
    );

    let manager = SessionManager::with_default_config(config.catalog);
    let session = manager.open()?;
    let formatter = formatter::create_formatter(config.format);

    let output = commands::execute(&session, &args.command, &*formatter)?;
    println!("{}", output);
    Ok(())
}

//! # trapi CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trapi_cli::mappings::{run_check_mappings, CheckMappingsArgs};
use trapi_cli::validate::{run_validate, ValidateArgs};
use trapi_cli::versions::run_versions;

/// TRAPI message validator.
///
/// Checks Translator Reasoner API messages against the versioned TRAPI
/// schemas and cross-checks knowledge graph node and edge references.
#[derive(Parser, Debug)]
#[command(name = "trapi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a TRAPI message file against its schema.
    Validate(ValidateArgs),

    /// Check knowledge graph node/edge references only.
    CheckMappings(CheckMappingsArgs),

    /// List known TRAPI versions.
    Versions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "trapi CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args).await,
        Commands::CheckMappings(args) => run_check_mappings(&args),
        Commands::Versions => run_versions(),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

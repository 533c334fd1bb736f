//! # Validate Subcommand
//!
//! Validates a TRAPI message file. Without `--component` the file is treated
//! as a `{"message": ...}` payload and gets the combined check (empty-message
//! guard, `Query` structural validation, knowledge-graph mapping). With
//! `--component` only structural validation against that component runs.
//!
//! A run with no findings at all is reported as `info.compliant`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use trapi_core::ValidationReporter;
use trapi_validator::{check_trapi_response, check_trapi_validity};

/// Arguments for the `trapi validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding the TRAPI message.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// TRAPI version selector (e.g. 1.3, 1.2.0). Defaults to the latest supported release.
    #[arg(long)]
    pub trapi_version: Option<String>,

    /// Validate against this component instead of running the full response check.
    #[arg(long)]
    pub component: Option<String>,

    /// Read schemas from a local directory laid out as `v{version}/TranslatorReasonerAPI.yaml`.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Print a text summary instead of JSON.
    #[arg(long)]
    pub text: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 without errors, 1 with error-level findings.
pub async fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let reporter = validate_file(args).await?;
    crate::print_report(&reporter, args.text)?;
    Ok(crate::exit_code(&reporter))
}

/// Run the checks selected by `args` and return the finished reporter.
pub async fn validate_file(args: &ValidateArgs) -> Result<ValidationReporter> {
    let instance = crate::read_json_file(&args.path)?;
    let repository = crate::build_repository(args.schema_dir.as_deref())?;
    let version = args.trapi_version.as_deref();

    let mut reporter = match &args.component {
        Some(component) => check_trapi_validity(repository, &instance, version, component)
            .await
            .with_context(|| format!("validation of {} against '{component}' failed", args.path.display()))?,
        None => check_trapi_response(repository, &instance, version)
            .await
            .with_context(|| format!("validation of {} failed", args.path.display()))?,
    };
    crate::mark_compliant_if_clean(&mut reporter);

    tracing::info!(
        path = %args.path.display(),
        version = reporter.trapi_version().unwrap_or_default(),
        errors = reporter.messages(trapi_core::MessageLevel::Error).len(),
        warnings = reporter.messages(trapi_core::MessageLevel::Warning).len(),
        "validation finished"
    );
    Ok(reporter)
}

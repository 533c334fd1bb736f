//! # trapi-cli: Command-Line TRAPI Validator
//!
//! Provides the `trapi` command-line interface.
//!
//! ## Subcommands
//!
//! - `trapi validate`: structural and mapping checks of a TRAPI message file.
//! - `trapi check-mappings`: mapping checks of a knowledge graph file only.
//! - `trapi versions`: known TRAPI releases and the default selector.
//!
//! ```bash
//! trapi validate response.json --trapi-version 1.3
//! trapi validate edge.json --component Edge --schema-dir ./ReasonerAPI
//! trapi check-mappings kg.json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | no error-level findings |
//! | 1 | at least one error-level finding |
//! | 2 | operational failure (unreadable input, unknown version, fetch error) |

pub mod mappings;
pub mod validate;
pub mod versions;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use trapi_core::{KnownVersions, MessageCode, ValidationReporter};
use trapi_schema::{
    DirectorySchemaSource, HttpSchemaSource, RepositoryConfig, SchemaRepository,
};

/// Read and parse a JSON input file.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Build a schema repository reading from `schema_dir`, or from the
/// configured HTTP source when no directory is given.
pub fn build_repository(schema_dir: Option<&Path>) -> Result<Arc<SchemaRepository>> {
    let resolver = Arc::new(KnownVersions::curated());
    let repository = match schema_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "using local schema directory");
            SchemaRepository::from_parts(
                Arc::new(DirectorySchemaSource::new(dir)),
                resolver,
                RepositoryConfig::default(),
            )
        }
        None => {
            let source = HttpSchemaSource::from_env().context("failed to build HTTP schema source")?;
            tracing::debug!(base_url = %source.base_url(), "using HTTP schema source");
            let config = RepositoryConfig {
                fetch_timeout: source.timeout(),
            };
            SchemaRepository::from_parts(Arc::new(source), resolver, config)
        }
    };
    Ok(Arc::new(repository))
}

/// Record `info.compliant` if the run found nothing at all.
pub fn mark_compliant_if_clean(reporter: &mut ValidationReporter) {
    if !reporter.has_messages(None) {
        reporter.report(MessageCode::Compliant);
    }
}

/// Print a reporter as pretty JSON, or as its text dump.
pub fn print_report(reporter: &ValidationReporter, text: bool) -> Result<()> {
    if text {
        print!("{}", reporter.dump());
    } else {
        let dict = reporter.to_dict().context("failed to render report")?;
        let rendered = serde_json::to_string_pretty(&dict).context("failed to render report")?;
        println!("{rendered}");
    }
    Ok(())
}

/// Exit code for a finished run.
pub fn exit_code(reporter: &ValidationReporter) -> u8 {
    if reporter.has_errors() {
        1
    } else {
        0
    }
}

//! Error types for schema loading and transformation.

use thiserror::Error;
use trapi_core::VersionError;

use crate::config::ConfigError;

/// Operational failure while producing a schema set.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The requested version is not a known TRAPI release.
    #[error(transparent)]
    UnknownVersion(#[from] VersionError),

    /// The schema source could not deliver the document.
    #[error("failed to fetch TRAPI {version} schema: {reason}")]
    Fetch {
        /// Canonical version being fetched.
        version: String,
        /// Reason reported by the source.
        reason: String,
    },

    /// The schema source did not answer within the fetch timeout.
    #[error("fetching TRAPI {version} schema timed out after {timeout_secs}s")]
    FetchTimeout {
        /// Canonical version being fetched.
        version: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },

    /// The document is not an OpenAPI document with `components.schemas`.
    #[error("malformed TRAPI {version} document: {reason}")]
    MalformedDocument {
        /// Version the document was fetched for.
        version: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A schema node could not be interpreted.
    #[error("malformed schema at '{path}': {reason}")]
    MalformedSchema {
        /// JSON Pointer of the offending node.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid source configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error reading a local schema document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

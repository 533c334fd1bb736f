//! # Error Types
//!
//! Operational errors shared by all TRAPI crates. Validation findings are
//! never represented here; they live in [`crate::report`].

use thiserror::Error;

/// Error raised when a requested TRAPI version cannot be served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The requested version did not resolve to a known TRAPI release.
    #[error("no TRAPI version {requested} (resolved to '{resolved}', which is not a known release)")]
    UnknownVersion {
        /// The selector the caller supplied.
        requested: String,
        /// The canonical form it resolved to.
        resolved: String,
    },
}

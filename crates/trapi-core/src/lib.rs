//! # trapi-core: Foundational Types for TRAPI Validation
//!
//! This crate is the leaf of the workspace dependency DAG. It defines the
//! pieces every validator shares:
//!
//! - [`versioning`]: resolution of user-supplied TRAPI version selectors
//!   (`None`, `"1.3"`, `"v1.2.0"`) to an exact released version, and the
//!   known-version check that guards every schema load.
//! - [`codes`]: the closed catalogue of validation message codes. The
//!   level of a message (`info`, `warning`, `error`) is derived from the
//!   namespace prefix of its code.
//! - [`report`]: the accumulating [`ValidationReporter`] sink and its
//!   serializable [`Report`] form.
//!
//! ## Two Channels
//!
//! Operational failures (unknown version, unreachable schema source) are
//! returned as `Err` values. Validation findings (schema violations, empty
//! graphs, dangling references) are recorded in a reporter and never
//! returned as errors. The absence of an `Err` does not imply compliance;
//! callers must inspect [`ValidationReporter::has_errors`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `trapi-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod codes;
pub mod error;
pub mod report;
pub mod versioning;

pub use codes::{MessageCode, MessageLevel};
pub use error::VersionError;
pub use report::{Report, RenderedMessage, ValidationMessage, ValidationReporter};
pub use versioning::{KnownVersions, VersionResolver, DEFAULT_TRAPI_VERSION, KNOWN_TRAPI_VERSIONS};

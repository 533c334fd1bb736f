//! # trapi-validator: TRAPI Message Validation
//!
//! Two independent validators write findings into a
//! [`ValidationReporter`](trapi_core::ValidationReporter):
//!
//! - [`structural`]: JSON-Schema validation of an instance against a named
//!   TRAPI component, using the self-contained schemas of a
//!   [`SchemaRepository`](trapi_schema::SchemaRepository).
//! - [`mapping`]: node/edge cross-reference checks on a knowledge graph.
//!
//! [`response`] combines both for a full `{"message": ...}` payload.
//!
//! ## Error Channel
//!
//! Functions return `Err(ValidatorError)` only for operational failures.
//! A non-conforming instance is `Ok` with errors in the reporter.

pub mod error;
pub mod mapping;
pub mod response;
pub mod structural;

pub use error::ValidatorError;
pub use mapping::{check_node_edge_mappings, MappingValidator};
pub use response::{check_trapi_response, is_empty_message};
pub use structural::{check_trapi_validity, TrapiSchemaValidator, Violation};

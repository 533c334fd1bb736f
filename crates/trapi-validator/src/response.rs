//! # Combined Response Check
//!
//! Validates a whole TRAPI `{"message": ...}` payload: an empty-message
//! guard, structural validation of the payload as a `Query`, and the
//! mapping checks on `message.knowledge_graph` when the message carries one.
//! All findings land in one reporter, structural findings first.

use std::sync::Arc;

use serde_json::Value;
use trapi_core::{MessageCode, ValidationReporter};
use trapi_schema::SchemaRepository;

use crate::error::ValidatorError;
use crate::mapping::MappingValidator;
use crate::structural::TrapiSchemaValidator;

/// Component a response payload is validated against.
pub const RESPONSE_COMPONENT: &str = "Query";

/// Whether `payload` lacks a usable `message`: absent, null, or an empty object.
pub fn is_empty_message(payload: &Value) -> bool {
    match payload.get("message") {
        None | Some(Value::Null) => true,
        Some(Value::Object(message)) => message.is_empty(),
        Some(_) => false,
    }
}

/// Run every check on a TRAPI response payload.
///
/// An empty message records `error.empty_message` and skips the other checks.
///
/// # Errors
///
/// Returns the operational errors of structural validation (unknown version,
/// unknown component, fetch or build failure). Findings are never errors.
pub async fn check_trapi_response(
    repository: Arc<SchemaRepository>,
    payload: &Value,
    trapi_version: Option<&str>,
) -> Result<ValidationReporter, ValidatorError> {
    let mut structural = TrapiSchemaValidator::new(repository, trapi_version)?;
    if is_empty_message(payload) {
        let mut reporter = structural.into_reporter();
        reporter.report(MessageCode::EmptyMessage);
        return Ok(reporter);
    }

    structural.is_valid_trapi_query(payload, RESPONSE_COMPONENT).await?;
    let mut reporter = structural.into_reporter();

    match payload.pointer("/message/knowledge_graph") {
        Some(graph) if graph.is_object() => {
            let mut mapping = MappingValidator::new();
            mapping.check_dangling_references(graph);
            reporter.merge(mapping.into_reporter());
        }
        _ => tracing::debug!("message has no knowledge graph; mapping check skipped"),
    }
    Ok(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_message_detection() {
        assert!(is_empty_message(&json!({})));
        assert!(is_empty_message(&json!({"message": null})));
        assert!(is_empty_message(&json!({"message": {}})));
        assert!(!is_empty_message(&json!({"message": {"results": []}})));
        assert!(!is_empty_message(&json!({"message": "text"})));
    }
}

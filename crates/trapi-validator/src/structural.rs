//! # Structural Validation
//!
//! Validates TRAPI instances against a named component of a versioned
//! [`SchemaSet`](trapi_schema::SchemaSet) with the `jsonschema` crate
//! (Draft 2020-12).
//!
//! ## Reference Resolution
//!
//! Every component schema embeds its siblings under `components.schemas`,
//! so internal `#/components/schemas/<name>` references resolve within the
//! document. The retriever refuses every other URI; a schema that reaches
//! outside itself fails to compile instead of triggering network access.
//!
//! ## Outcomes
//!
//! | Situation | Result |
//! |-----------|--------|
//! | unknown version / fetch failure | `Err(ValidatorError::Schema)` |
//! | unknown component | `Err(ValidatorError::UnknownComponent)` |
//! | schema does not compile | `Err(ValidatorError::ValidatorBuild)` |
//! | instance violates the schema | `Ok`, the shallowest violation recorded as `error.validation` |
//! | instance conforms | `Ok`, nothing recorded |

use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use trapi_core::{MessageCode, ValidationReporter};
use trapi_schema::SchemaRepository;

use crate::error::ValidatorError;

/// Reporter prefix for structural validation runs.
pub const STRUCTURAL_PREFIX: &str = "TRAPI Validation";

/// Retriever that resolves nothing. Component schemas are self-contained.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference '{}' is not resolvable offline", uri.as_str()).into())
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance (`/` for the root).
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.instance_path, self.message)
    }
}

/// Validates instances against TRAPI components of one release.
///
/// Holds the reporter of its run; create one validator per instance.
#[derive(Debug)]
pub struct TrapiSchemaValidator {
    repository: Arc<SchemaRepository>,
    trapi_version: String,
    reporter: ValidationReporter,
}

impl TrapiSchemaValidator {
    /// Create a validator for `trapi_version` (the resolver default if `None`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Schema`] if the version is not a known release.
    pub fn new(
        repository: Arc<SchemaRepository>,
        trapi_version: Option<&str>,
    ) -> Result<Self, ValidatorError> {
        let trapi_version = repository.resolve_version(trapi_version)?;
        let reporter = ValidationReporter::new(STRUCTURAL_PREFIX).with_trapi_version(trapi_version.clone());
        Ok(Self {
            repository,
            trapi_version,
            reporter,
        })
    }

    /// Canonical version this validator checks against.
    pub fn trapi_version(&self) -> &str {
        &self.trapi_version
    }

    pub fn reporter(&self) -> &ValidationReporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> ValidationReporter {
        self.reporter
    }

    /// Validate `instance` against `component` and return every violation.
    ///
    /// Nothing is recorded in the reporter.
    ///
    /// # Errors
    ///
    /// - [`ValidatorError::Schema`] if the schema set cannot be loaded.
    /// - [`ValidatorError::UnknownComponent`] if `component` is not defined.
    /// - [`ValidatorError::ValidatorBuild`] if the component schema does not compile.
    pub async fn validate(&self, instance: &Value, component: &str) -> Result<Vec<Violation>, ValidatorError> {
        let validator = self.build_validator(component).await?;
        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: pointer_or_root(e.instance_path.to_string()),
                schema_path: pointer_or_root(e.schema_path.to_string()),
                message: e.to_string(),
            })
            .collect();
        tracing::debug!(
            version = %self.trapi_version,
            component,
            violations = violations.len(),
            "structural validation finished"
        );
        Ok(violations)
    }

    /// Validate `instance` against `component`, recording the most relevant
    /// violation as `error.validation`. Returns whether the instance conforms.
    ///
    /// The most relevant violation is the one closest to the instance root;
    /// ties keep the order `jsonschema` reports.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate). Operational errors record nothing.
    pub async fn is_valid_trapi_query(&mut self, instance: &Value, component: &str) -> Result<bool, ValidatorError> {
        let violations = self.validate(instance, component).await?;
        let Some(first) = most_relevant(violations) else {
            return Ok(true);
        };
        self.reporter.report_with_context(
            MessageCode::SchemaValidation,
            [
                ("trapi_version", self.trapi_version.clone()),
                ("component", component.to_string()),
                ("path", first.instance_path),
                ("reason", first.message),
            ],
        );
        Ok(false)
    }

    async fn build_validator(&self, component: &str) -> Result<Validator, ValidatorError> {
        let set = self.repository.load(&self.trapi_version).await?;
        let schema = set.get(component).ok_or_else(|| ValidatorError::UnknownComponent {
            component: component.to_string(),
            version: self.trapi_version.clone(),
        })?;

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(OfflineRetriever);
        opts.build(schema).map_err(|e| ValidatorError::ValidatorBuild {
            component: component.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Validate one instance against one component and return the run's reporter.
///
/// # Errors
///
/// Returns the operational errors of [`TrapiSchemaValidator::validate`].
pub async fn check_trapi_validity(
    repository: Arc<SchemaRepository>,
    instance: &Value,
    trapi_version: Option<&str>,
    component: &str,
) -> Result<ValidationReporter, ValidatorError> {
    let mut validator = TrapiSchemaValidator::new(repository, trapi_version)?;
    validator.is_valid_trapi_query(instance, component).await?;
    Ok(validator.into_reporter())
}

fn most_relevant(violations: Vec<Violation>) -> Option<Violation> {
    violations.into_iter().min_by_key(|v| pointer_depth(&v.instance_path))
}

fn pointer_depth(pointer: &str) -> usize {
    if pointer == "/" {
        0
    } else {
        pointer.matches('/').count()
    }
}

fn pointer_or_root(pointer: String) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trapi_core::KnownVersions;
    use trapi_schema::StaticSchemaSource;

    fn repository() -> Arc<SchemaRepository> {
        let source = StaticSchemaSource::new().with_document(
            "1.3.0",
            json!({"components": {"schemas": {
                "Pair": {
                    "type": "object",
                    "properties": {
                        "left": {"$ref": "#/components/schemas/Name"},
                        "right": {"allOf": [{"$ref": "#/components/schemas/Name"}], "nullable": true}
                    },
                    "required": ["left"]
                },
                "Name": {"type": "string", "minLength": 1},
                "Remote": {"$ref": "https://example.org/remote.json"}
            }}}),
        );
        Arc::new(SchemaRepository::new(source, KnownVersions::curated()))
    }

    #[tokio::test]
    async fn test_conforming_instance_records_nothing() {
        let mut validator = TrapiSchemaValidator::new(repository(), Some("1.3")).unwrap();
        let ok = validator
            .is_valid_trapi_query(&json!({"left": "a", "right": null}), "Pair")
            .await
            .unwrap();
        assert!(ok);
        assert!(!validator.reporter().has_messages(None));
        assert_eq!(validator.trapi_version(), "1.3.0");
    }

    #[tokio::test]
    async fn test_violation_is_recorded_with_context() {
        let mut validator = TrapiSchemaValidator::new(repository(), Some("1.3.0")).unwrap();
        let ok = validator.is_valid_trapi_query(&json!({"left": ""}), "Pair").await.unwrap();
        assert!(!ok);

        let errors = validator.reporter().messages(trapi_core::MessageLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, MessageCode::SchemaValidation);
        assert_eq!(errors[0].context["trapi_version"], "1.3.0");
        assert_eq!(errors[0].context["component"], "Pair");
        assert_eq!(errors[0].context["path"], "/left");
    }

    #[tokio::test]
    async fn test_validate_lists_every_violation() {
        let validator = TrapiSchemaValidator::new(repository(), None).unwrap();
        let violations = validator
            .validate(&json!({"left": "", "right": 5}), "Pair")
            .await
            .unwrap();
        assert!(violations.len() >= 2, "got {violations:?}");
        assert!(!validator.reporter().has_messages(None));
    }

    #[tokio::test]
    async fn test_missing_required_property_points_at_root() {
        let validator = TrapiSchemaValidator::new(repository(), None).unwrap();
        let violations = validator.validate(&json!({}), "Pair").await.unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/");
        assert!(violations[0].message.contains("left"));
    }

    fn violation(instance_path: &str, message: &str) -> Violation {
        Violation {
            instance_path: instance_path.to_string(),
            schema_path: "/".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_most_relevant_prefers_shallowest_path() {
        let picked = most_relevant(vec![
            violation("/message/knowledge_graph/nodes/n1", "deep"),
            violation("/message", "shallow"),
            violation("/message/results", "middle"),
            violation("/message/query_graph", "middle too"),
        ])
        .unwrap();
        assert_eq!(picked.message, "shallow");

        let root = most_relevant(vec![violation("/a", "child"), violation("/", "root")]).unwrap();
        assert_eq!(root.message, "root");

        let tie = most_relevant(vec![violation("/b", "first"), violation("/a", "second")]).unwrap();
        assert_eq!(tie.message, "first");

        assert!(most_relevant(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_recorded_violation_is_the_shallowest() {
        let mut validator = TrapiSchemaValidator::new(repository(), None).unwrap();
        let ok = validator
            .is_valid_trapi_query(&json!({"right": ""}), "Pair")
            .await
            .unwrap();
        assert!(!ok);
        let errors = validator.reporter().messages(trapi_core::MessageLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["path"], "/");
    }

    #[tokio::test]
    async fn test_self_referencing_component_validates() {
        let source = StaticSchemaSource::new().with_document(
            "1.3.0",
            json!({"components": {"schemas": {
                "Tree": {
                    "type": "object",
                    "properties": {
                        "label": {"type": "string"},
                        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Tree"}}
                    },
                    "required": ["label"]
                }
            }}}),
        );
        let repository = Arc::new(SchemaRepository::new(source, KnownVersions::curated()));
        let validator = TrapiSchemaValidator::new(repository, None).unwrap();

        let tree = json!({"label": "root", "children": [{"label": "leaf", "children": []}]});
        assert!(validator.validate(&tree, "Tree").await.unwrap().is_empty());

        let broken = json!({"label": "root", "children": [{"children": []}]});
        let violations = validator.validate(&broken, "Tree").await.unwrap();
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].instance_path, "/children/0");
    }

    #[tokio::test]
    async fn test_unknown_component_is_an_error() {
        let mut validator = TrapiSchemaValidator::new(repository(), None).unwrap();
        let err = validator.is_valid_trapi_query(&json!({}), "Nope").await.unwrap_err();
        assert!(
            matches!(err, ValidatorError::UnknownComponent { ref component, ref version }
                if component == "Nope" && version == "1.3.0"),
            "got {err}"
        );
        assert!(!validator.reporter().has_messages(None));
    }

    #[test]
    fn test_unknown_version_is_an_error() {
        let err = TrapiSchemaValidator::new(repository(), Some("99.9.9")).unwrap_err();
        assert!(matches!(err, ValidatorError::Schema(trapi_schema::SchemaError::UnknownVersion(_))));
    }

    #[tokio::test]
    async fn test_external_reference_fails_to_build() {
        let validator = TrapiSchemaValidator::new(repository(), None).unwrap();
        let err = validator.validate(&json!("x"), "Remote").await.unwrap_err();
        assert!(matches!(err, ValidatorError::ValidatorBuild { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_check_trapi_validity_returns_run_reporter() {
        let reporter = check_trapi_validity(repository(), &json!({"left": 3}), Some("1.3"), "Pair")
            .await
            .unwrap();
        assert!(reporter.has_errors());
        assert_eq!(reporter.trapi_version(), Some("1.3.0"));
        assert_eq!(reporter.prefix(), STRUCTURAL_PREFIX);
    }
}

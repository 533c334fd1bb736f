//! # Schema Sources
//!
//! Where TRAPI OpenAPI documents come from. The repository only depends on
//! the [`SchemaSource`] trait; three implementations are provided:
//!
//! | Source | Location of release `X.Y.Z` |
//! |--------|-----------------------------|
//! | [`HttpSchemaSource`] | `GET {base_url}/vX.Y.Z/TranslatorReasonerAPI.yaml` |
//! | [`DirectorySchemaSource`] | `{root}/vX.Y.Z/TranslatorReasonerAPI.yaml` (or `.json`) |
//! | [`StaticSchemaSource`] | in-memory documents keyed by version |

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::SchemaSourceConfig;
use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// File name of the TRAPI OpenAPI document within a release.
pub const SCHEMA_FILE_STEM: &str = "TranslatorReasonerAPI";

/// Delivers the OpenAPI document of a TRAPI release.
///
/// Implementations must be `Send + Sync` so a repository can share them
/// across concurrent loads. The trait is object-safe.
#[async_trait]
pub trait SchemaSource: Send + Sync + fmt::Debug {
    /// Fetch and parse the document for an exact, canonical `version`.
    async fn fetch(&self, version: &str) -> Result<SchemaDocument, SchemaError>;

    /// Short description for logs, e.g. the base URL.
    fn describe(&self) -> String;
}

/// Fetches documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpSchemaSource {
    /// Build a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &SchemaSourceConfig) -> Result<Self, SchemaError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SchemaError::Fetch {
                version: "client_init".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Build a source from `TRAPI_SCHEMA_BASE_URL` and `TRAPI_FETCH_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] for invalid variables, and the errors of
    /// [`new`](Self::new).
    pub fn from_env() -> Result<Self, SchemaError> {
        let config = SchemaSourceConfig::from_env()?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout the client was built with.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of the document for `version`.
    pub fn document_url(&self, version: &str) -> Result<Url, SchemaError> {
        let raw = format!(
            "{}/v{version}/{SCHEMA_FILE_STEM}.yaml",
            self.base_url.as_str().trim_end_matches('/')
        );
        Url::parse(&raw).map_err(|e| SchemaError::Fetch {
            version: version.to_string(),
            reason: format!("invalid document URL '{raw}': {e}"),
        })
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self, version: &str) -> Result<SchemaDocument, SchemaError> {
        let url = self.document_url(version)?;
        tracing::debug!(%url, "fetching TRAPI schema");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                SchemaError::FetchTimeout {
                    version: version.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                SchemaError::Fetch {
                    version: version.to_string(),
                    reason: format!("GET {url}: {e}"),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::Fetch {
                version: version.to_string(),
                reason: format!("GET {url}: HTTP {status}"),
            });
        }

        let text = response.text().await.map_err(|e| SchemaError::Fetch {
            version: version.to_string(),
            reason: format!("reading body of {url}: {e}"),
        })?;
        SchemaDocument::from_yaml_str(version, &text)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Reads documents from a local directory laid out like the upstream repository.
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    root: PathBuf,
}

impl DirectorySchemaSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, version: &str) -> [PathBuf; 2] {
        let dir = self.root.join(format!("v{version}"));
        [
            dir.join(format!("{SCHEMA_FILE_STEM}.yaml")),
            dir.join(format!("{SCHEMA_FILE_STEM}.json")),
        ]
    }
}

#[async_trait]
impl SchemaSource for DirectorySchemaSource {
    async fn fetch(&self, version: &str) -> Result<SchemaDocument, SchemaError> {
        for path in self.candidates(version) {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    tracing::debug!(path = %path.display(), "read TRAPI schema");
                    return SchemaDocument::from_yaml_str(version, &text);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(SchemaError::Io(e)),
            }
        }
        Err(SchemaError::Fetch {
            version: version.to_string(),
            reason: format!(
                "no {SCHEMA_FILE_STEM}.yaml or .json under {}",
                self.root.join(format!("v{version}")).display()
            ),
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Serves documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    documents: HashMap<String, Value>,
}

impl StaticSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the raw OpenAPI document for `version`.
    pub fn with_document(mut self, version: impl Into<String>, document: Value) -> Self {
        self.documents.insert(version.into(), document);
        self
    }
}

#[async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn fetch(&self, version: &str) -> Result<SchemaDocument, SchemaError> {
        let document = self.documents.get(version).ok_or_else(|| SchemaError::Fetch {
            version: version.to_string(),
            reason: "no document registered for this version".to_string(),
        })?;
        SchemaDocument::from_value(version, document)
    }

    fn describe(&self) -> String {
        format!("static ({} documents)", self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_url_uses_version_tag() {
        let config = SchemaSourceConfig {
            base_url: "https://example.org/ReasonerAPI/".parse().unwrap(),
            timeout_secs: 5,
        };
        let source = HttpSchemaSource::new(&config).unwrap();
        assert_eq!(
            source.document_url("1.3.0").unwrap().as_str(),
            "https://example.org/ReasonerAPI/v1.3.0/TranslatorReasonerAPI.yaml"
        );
    }

    #[tokio::test]
    async fn test_static_source_serves_registered_documents() {
        let source = StaticSchemaSource::new().with_document(
            "1.3.0",
            json!({"components": {"schemas": {"Query": {"type": "object"}}}}),
        );
        let doc = source.fetch("1.3.0").await.unwrap();
        assert!(doc.components().contains_key("Query"));
        assert!(matches!(
            source.fetch("1.2.0").await,
            Err(SchemaError::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_directory_source_reads_yaml_then_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("v1.2.0")).unwrap();
        std::fs::write(
            dir.path().join("v1.2.0/TranslatorReasonerAPI.json"),
            r#"{"components": {"schemas": {"Message": {"type": "object"}}}}"#,
        )
        .unwrap();

        let source = DirectorySchemaSource::new(dir.path());
        let doc = source.fetch("1.2.0").await.unwrap();
        assert!(doc.components().contains_key("Message"));

        let err = source.fetch("1.3.0").await.unwrap_err();
        assert!(matches!(err, SchemaError::Fetch { .. }), "got {err}");
    }

    #[test]
    fn test_sources_are_object_safe() {
        let sources: Vec<Box<dyn SchemaSource>> = vec![
            Box::new(StaticSchemaSource::new()),
            Box::new(DirectorySchemaSource::new("/nonexistent")),
        ];
        assert_eq!(sources[0].describe(), "static (0 documents)");
        assert_eq!(sources[1].describe(), "/nonexistent");
    }
}

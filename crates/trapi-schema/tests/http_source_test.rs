//! Contract tests for `HttpSchemaSource` against a simulated ReasonerAPI
//! raw-content host.
//!
//! Documents are served at `/v{version}/TranslatorReasonerAPI.yaml`.

use std::sync::Arc;

use trapi_core::KnownVersions;
use trapi_schema::{
    HttpSchemaSource, RepositoryConfig, SchemaError, SchemaRepository, SchemaSource, SchemaSourceConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MINI_TRAPI_YAML: &str = r#"
openapi: 3.0.1
info:
  title: OpenAPI for NCATS Biomedical Translator Reasoners
  version: 1.3.0
paths:
  /query:
    post:
      responses:
        200:
          description: OK
components:
  schemas:
    Query:
      type: object
      properties:
        message:
          $ref: '#/components/schemas/Message'
      required:
        - message
    Message:
      type: object
      properties:
        results:
          type: array
          items:
            type: object
          nullable: true
"#;

async fn test_source(mock_server: &MockServer) -> HttpSchemaSource {
    let config = SchemaSourceConfig {
        base_url: mock_server.uri().parse().unwrap(),
        timeout_secs: 5,
    };
    HttpSchemaSource::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_requests_versioned_document_and_parses_yaml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.3.0/TranslatorReasonerAPI.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MINI_TRAPI_YAML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = test_source(&mock_server).await;
    let doc = source.fetch("1.3.0").await.unwrap();

    assert_eq!(doc.version(), "1.3.0");
    let names: Vec<&str> = doc.components().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Message", "Query"]);
}

#[tokio::test]
async fn fetch_maps_not_found_to_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.1.3/TranslatorReasonerAPI.yaml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = test_source(&mock_server).await;
    let err = source.fetch("1.1.3").await.unwrap_err();

    match err {
        SchemaError::Fetch { version, reason } => {
            assert_eq!(version, "1.1.3");
            assert!(reason.contains("404"), "got {reason}");
        }
        other => panic!("expected Fetch, got {other}"),
    }
}

#[tokio::test]
async fn fetch_rejects_non_yaml_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.3.0/TranslatorReasonerAPI.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("openapi: [unterminated"))
        .mount(&mock_server)
        .await;

    let source = test_source(&mock_server).await;
    let err = source.fetch("1.3.0").await.unwrap_err();
    assert!(matches!(err, SchemaError::MalformedDocument { .. }), "got {err}");
}

#[tokio::test]
async fn repository_over_http_fetches_each_version_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.3.0/TranslatorReasonerAPI.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MINI_TRAPI_YAML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = test_source(&mock_server).await;
    let repo = SchemaRepository::from_parts(
        Arc::new(source),
        Arc::new(KnownVersions::curated()),
        RepositoryConfig::default(),
    );

    let first = repo.load("1.3").await.unwrap();
    let second = repo.load("1.3.0").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let message = first.get("Message").unwrap();
    assert_eq!(message["properties"]["results"]["oneOf"][1]["type"], "null");
}

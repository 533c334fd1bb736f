//! # trapi-schema: TRAPI Schema Transformation and Caching
//!
//! Turns a versioned TRAPI OpenAPI 3.0 document into a set of
//! self-contained JSON Schemas, one per named component, and caches the
//! result per release.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaSource::fetch(version)         raw OpenAPI document (YAML/JSON)
//!        │
//!        ▼
//! SchemaDocument::transformed_components   every component through
//!        │                                  transform::openapi_to_jsonschema
//!        ▼
//! SchemaSet::from_components           component body + all *other*
//!        │                             components under components.schemas
//!        ▼
//! SchemaRepository (cache)             Arc<SchemaSet> per canonical version
//! ```
//!
//! ## Concurrency
//!
//! [`SchemaRepository::load`] admits concurrent readers and runs at most one
//! build per missing version. Waiters for the same version receive the
//! finished set; requests for different versions do not block each other.

pub mod config;
pub mod document;
pub mod error;
pub mod node;
pub mod repository;
pub mod schema_set;
pub mod source;
pub mod transform;

pub use config::{ConfigError, RepositoryConfig, SchemaSourceConfig};
pub use document::SchemaDocument;
pub use error::SchemaError;
pub use node::{ScalarType, SchemaNode, Shape};
pub use repository::SchemaRepository;
pub use schema_set::SchemaSet;
pub use source::{DirectorySchemaSource, HttpSchemaSource, SchemaSource, StaticSchemaSource};
pub use transform::{openapi_to_jsonschema, transform_value};

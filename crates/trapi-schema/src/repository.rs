//! # Schema Repository
//!
//! Loads, transforms and caches [`SchemaSet`]s per canonical TRAPI version.
//!
//! ## Load Sequence
//!
//! 1. Resolve the selector and require a known release. This happens
//!    before any cache or source access.
//! 2. Return the cached set on a hit.
//! 3. On a miss, fetch the document (bounded by the fetch timeout),
//!    transform every component, assemble the set and cache it.
//!
//! ## Cache
//!
//! One `tokio::sync::OnceCell` per version behind a `parking_lot::Mutex`.
//! The mutex guards only the version → cell map and is never held across
//! `.await`. The cell admits one initializer at a time: concurrent loads of
//! the same missing version share one fetch, and nobody observes a partial
//! set. A failed build leaves the cell empty so the next load retries.
//! Only `invalidate` evicts, and only entries whose build has completed; an
//! in-flight build keeps its cell so every waiter still shares one fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use trapi_core::VersionResolver;

use crate::config::RepositoryConfig;
use crate::error::SchemaError;
use crate::schema_set::SchemaSet;
use crate::source::SchemaSource;

type CacheCell = Arc<OnceCell<Arc<SchemaSet>>>;

#[derive(Debug, Default)]
struct SchemaCache {
    entries: Mutex<HashMap<String, CacheCell>>,
}

impl SchemaCache {
    fn cell(&self, version: &str) -> CacheCell {
        let mut entries = self.entries.lock();
        Arc::clone(entries.entry(version.to_string()).or_default())
    }

    fn versions(&self) -> Vec<String> {
        let entries = self.entries.lock();
        let mut versions: Vec<String> = entries
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(version, _)| version.clone())
            .collect();
        versions.sort();
        versions
    }

    /// Remove a built entry. An entry still being built is left in place.
    fn remove(&self, version: &str) -> bool {
        let mut entries = self.entries.lock();
        if !entries.get(version).is_some_and(|cell| cell.initialized()) {
            return false;
        }
        entries.remove(version).is_some()
    }
}

/// Per-version source of self-contained TRAPI component schemas.
#[derive(Debug)]
pub struct SchemaRepository {
    source: Arc<dyn SchemaSource>,
    resolver: Arc<dyn VersionResolver>,
    config: RepositoryConfig,
    cache: SchemaCache,
}

impl SchemaRepository {
    /// Create a repository with the default configuration and an empty cache.
    pub fn new(source: impl SchemaSource + 'static, resolver: impl VersionResolver + 'static) -> Self {
        Self::from_parts(Arc::new(source), Arc::new(resolver), RepositoryConfig::default())
    }

    /// Create a repository from shared parts.
    pub fn from_parts(
        source: Arc<dyn SchemaSource>,
        resolver: Arc<dyn VersionResolver>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            source,
            resolver,
            config,
            cache: SchemaCache::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// The resolver this repository checks versions against.
    pub fn resolver(&self) -> &dyn VersionResolver {
        self.resolver.as_ref()
    }

    /// Resolve a selector to a known canonical version.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownVersion`] if it is not a known release.
    pub fn resolve_version(&self, version: Option<&str>) -> Result<String, SchemaError> {
        Ok(self.resolver.ensure_known(version)?)
    }

    /// Load the schema set for `version`, building and caching it on first use.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownVersion`] if `version` is not a known release.
    /// - [`SchemaError::Fetch`] / [`SchemaError::FetchTimeout`] if the source fails.
    /// - [`SchemaError::MalformedDocument`] / [`SchemaError::MalformedSchema`]
    ///   if the document cannot be transformed.
    pub async fn load(&self, version: &str) -> Result<Arc<SchemaSet>, SchemaError> {
        let canonical = self.resolve_version(Some(version))?;
        let cell = self.cache.cell(&canonical);

        if let Some(set) = cell.get() {
            tracing::debug!(version = %canonical, "schema cache hit");
            return Ok(Arc::clone(set));
        }

        let set = cell.get_or_try_init(|| self.build(&canonical)).await?;
        Ok(Arc::clone(set))
    }

    /// Versions with a fully built set in the cache, sorted.
    pub fn cached_versions(&self) -> Vec<String> {
        self.cache.versions()
    }

    /// Drop the cached set for `version`. Returns whether a built set was removed.
    ///
    /// A build in flight is not interrupted and stays cached once it completes.
    pub fn invalidate(&self, version: &str) -> bool {
        let canonical = self.resolver.resolve(Some(version));
        self.cache.remove(&canonical)
    }

    async fn build(&self, version: &str) -> Result<Arc<SchemaSet>, SchemaError> {
        let started = Instant::now();
        tracing::debug!(version, source = %self.source.describe(), "building schema set");

        let fetched = tokio::time::timeout(self.config.fetch_timeout, self.source.fetch(version)).await;
        let document = match fetched {
            Ok(Ok(document)) => document,
            Ok(Err(e)) => {
                tracing::warn!(version, error = %e, "schema fetch failed");
                return Err(e);
            }
            Err(_elapsed) => {
                let timeout_secs = self.config.fetch_timeout.as_secs();
                tracing::warn!(version, timeout_secs, "schema fetch timed out");
                return Err(SchemaError::FetchTimeout {
                    version: version.to_string(),
                    timeout_secs,
                });
            }
        };

        let components = document.transformed_components()?;
        let set = SchemaSet::from_components(version, components);
        tracing::info!(
            version,
            components = set.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built TRAPI schema set"
        );
        Ok(Arc::new(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSchemaSource;
    use serde_json::json;
    use trapi_core::KnownVersions;

    fn repository() -> SchemaRepository {
        let source = StaticSchemaSource::new().with_document(
            "1.3.0",
            json!({"components": {"schemas": {
                "A": {"type": "object", "nullable": true},
                "B": {"allOf": [{"$ref": "#/components/schemas/A"}]}
            }}}),
        );
        SchemaRepository::new(source, KnownVersions::curated())
    }

    #[tokio::test]
    async fn test_load_builds_transformed_set() {
        let repo = repository();
        let set = repo.load("1.3").await.unwrap();
        assert_eq!(set.version(), "1.3.0");
        assert_eq!(set.component_names(), vec!["A", "B"]);
        let b = set.get("B").unwrap();
        assert_eq!(b["oneOf"], json!([{"$ref": "#/components/schemas/A"}]));
        assert!(b["components"]["schemas"]["A"].get("nullable").is_none());
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected_before_cache() {
        let repo = repository();
        let err = repo.load("99.9.9").await.unwrap_err();
        assert!(matches!(err, SchemaError::UnknownVersion(_)), "got {err}");
        assert!(repo.cached_versions().is_empty());
        assert!(repo.cache.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_known_but_unavailable_version_is_not_cached() {
        let repo = repository();
        let err = repo.load("1.2.0").await.unwrap_err();
        assert!(matches!(err, SchemaError::Fetch { .. }), "got {err}");
        assert!(repo.cached_versions().is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_drops_built_entry() {
        let repo = repository();
        repo.load("1.3.0").await.unwrap();
        assert_eq!(repo.cached_versions(), vec!["1.3.0"]);
        assert!(repo.invalidate("1.3"));
        assert!(repo.cached_versions().is_empty());
        assert!(!repo.invalidate("1.3.0"));
    }

    #[test]
    fn test_invalidate_keeps_entry_under_construction() {
        let repo = repository();
        let pending = repo.cache.cell("1.3.0");
        assert!(!pending.initialized());

        assert!(!repo.invalidate("1.3.0"));
        let entries = repo.cache.entries.lock();
        assert!(entries.contains_key("1.3.0"));
        assert!(Arc::ptr_eq(&entries["1.3.0"], &pending));
    }
}

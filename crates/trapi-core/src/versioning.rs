//! # TRAPI Version Resolution
//!
//! Maps a caller-supplied version selector to an exact TRAPI release and
//! checks it against the curated set of known releases.
//!
//! ## Selector Rules
//!
//! - Absent or blank → the configured default selector (`"1.3"`).
//! - A leading `v` is ignored (`"v1.2.0"` ≡ `"1.2.0"`).
//! - A full semantic version resolves to itself, known or not.
//! - A partial `MAJOR` or `MAJOR.MINOR` selector resolves to the highest
//!   known stable release matching it. When only pre-releases match, the
//!   highest pre-release is chosen (`"1.4"` → `"1.4.0-beta"`).
//! - Anything else resolves to itself and then fails [`VersionResolver::is_known`].

use std::fmt;

use semver::{Version, VersionReq};

use crate::error::VersionError;

/// Curated list of released TRAPI schema versions.
pub const KNOWN_TRAPI_VERSIONS: &[&str] = &[
    "1.0.0",
    "1.1.0",
    "1.1.1",
    "1.1.2",
    "1.1.3",
    "1.2.0",
    "1.3.0",
    "1.4.0-beta",
];

/// Selector used when the caller does not name a version.
pub const DEFAULT_TRAPI_VERSION: &str = "1.3";

/// Resolves version selectors against a known set of TRAPI releases.
///
/// Implementations must be `Send + Sync`; a single resolver is shared by
/// every request served from a schema repository.
pub trait VersionResolver: Send + Sync + fmt::Debug {
    /// Resolve a selector to its canonical version string.
    fn resolve(&self, version: Option<&str>) -> String;

    /// Whether `version` is an exact known release.
    fn is_known(&self, version: &str) -> bool;

    /// All known releases in ascending order.
    fn known_versions(&self) -> Vec<String>;

    /// Resolve a selector and require the result to be a known release.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::UnknownVersion`] if the resolved version is
    /// not in the known set.
    fn ensure_known(&self, version: Option<&str>) -> Result<String, VersionError> {
        let resolved = self.resolve(version);
        if self.is_known(&resolved) {
            Ok(resolved)
        } else {
            Err(VersionError::UnknownVersion {
                requested: version.unwrap_or("<default>").to_string(),
                resolved,
            })
        }
    }
}

/// A fixed, externally curated set of TRAPI releases.
#[derive(Debug, Clone)]
pub struct KnownVersions {
    versions: Vec<Version>,
    default_selector: String,
}

impl KnownVersions {
    /// Build a version set from release strings and a default selector.
    ///
    /// # Errors
    ///
    /// Returns a `semver::Error` if any release string is not a valid
    /// semantic version.
    pub fn new<I, S>(versions: I, default_selector: impl Into<String>) -> Result<Self, semver::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = versions
            .into_iter()
            .map(|v| Version::parse(strip_v(v.as_ref().trim())))
            .collect::<Result<Vec<_>, _>>()?;
        parsed.sort();
        parsed.dedup();
        Ok(Self {
            versions: parsed,
            default_selector: default_selector.into(),
        })
    }

    /// The curated TRAPI release list with `"1.3"` as the default selector.
    pub fn curated() -> Self {
        let mut versions: Vec<Version> = KNOWN_TRAPI_VERSIONS
            .iter()
            .filter_map(|v| Version::parse(v).ok())
            .collect();
        versions.sort();
        Self {
            versions,
            default_selector: DEFAULT_TRAPI_VERSION.to_string(),
        }
    }

    /// Returns the selector applied when no version is requested.
    pub fn default_selector(&self) -> &str {
        &self.default_selector
    }

    fn best_match(&self, selector: &str) -> Option<&Version> {
        let stable = VersionReq::parse(&format!("={selector}"))
            .ok()
            .and_then(|req| self.versions.iter().filter(|v| req.matches(v)).max());
        if stable.is_some() {
            return stable;
        }

        // Pre-releases never satisfy a bare `=MAJOR.MINOR` requirement.
        let mut parts = selector.split('.').map(|p| p.parse::<u64>().ok());
        let major = parts.next().flatten()?;
        let minor = parts.next().flatten();
        self.versions
            .iter()
            .filter(|v| v.major == major && minor.map_or(true, |m| v.minor == m))
            .max()
    }
}

impl Default for KnownVersions {
    fn default() -> Self {
        Self::curated()
    }
}

impl VersionResolver for KnownVersions {
    fn resolve(&self, version: Option<&str>) -> String {
        let selector = version
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_selector);
        let selector = strip_v(selector);

        if let Ok(exact) = Version::parse(selector) {
            return exact.to_string();
        }
        if is_partial(selector) {
            if let Some(best) = self.best_match(selector) {
                return best.to_string();
            }
        }
        selector.to_string()
    }

    fn is_known(&self, version: &str) -> bool {
        Version::parse(strip_v(version.trim()))
            .map(|v| self.versions.contains(&v))
            .unwrap_or(false)
    }

    fn known_versions(&self) -> Vec<String> {
        self.versions.iter().map(Version::to_string).collect()
    }
}

fn strip_v(selector: &str) -> &str {
    selector.strip_prefix('v').unwrap_or(selector)
}

/// `MAJOR` or `MAJOR.MINOR`, numeric components only.
fn is_partial(selector: &str) -> bool {
    let parts: Vec<&str> = selector.split('.').collect();
    (1..=2).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

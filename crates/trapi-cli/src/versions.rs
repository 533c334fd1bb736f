//! # Versions Subcommand
//!
//! Lists the known TRAPI releases and what the default selector resolves to.

use anyhow::Result;
use trapi_core::{KnownVersions, VersionResolver};

/// Text listing of known versions, one per line, default marked with `*`.
pub fn render_versions(resolver: &KnownVersions) -> String {
    let default = resolver.resolve(None);
    let mut out = format!("default selector: {} -> {default}\n", resolver.default_selector());
    for version in resolver.known_versions() {
        let marker = if version == default { '*' } else { ' ' };
        out.push_str(&format!("{marker} {version}\n"));
    }
    out
}

/// Execute the versions subcommand.
pub fn run_versions() -> Result<u8> {
    print!("{}", render_versions(&KnownVersions::curated()));
    Ok(0)
}

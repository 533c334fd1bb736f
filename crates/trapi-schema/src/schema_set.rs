//! # Per-Component Schema Sets
//!
//! For every component `C` of a transformed document, the set holds a
//! self-contained schema: `C`'s own body at the top level plus every
//! *other* component under `components.schemas`, so that internal
//! `#/components/schemas/<name>` references resolve without any external
//! lookup. Each entry owns its copy of the sibling definitions.
//!
//! `C` is not embedded in its own schema, so references to
//! `#/components/schemas/C` anywhere in that schema (its body and any
//! sibling that refers back to it) are rewritten to the document root `#`.
//! Recursive components like TRAPI's `Attribute` stay resolvable.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::node::escape_pointer;

const COMPONENTS_POINTER: &str = "#/components/schemas/";

/// Self-contained schemas for one TRAPI release, keyed by component name.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSet {
    version: String,
    schemas: BTreeMap<String, Value>,
}

impl SchemaSet {
    /// Assemble a set from already-transformed component schemas.
    pub fn from_components(version: impl Into<String>, components: BTreeMap<String, Value>) -> Self {
        let schemas = components
            .keys()
            .filter_map(|name| {
                let mut siblings = components.clone();
                let body = siblings.remove(name)?;
                let mut schema = match body {
                    Value::Object(obj) => obj,
                    other => return Some((name.clone(), other)),
                };
                schema.insert(
                    "components".to_string(),
                    json!({ "schemas": Value::Object(siblings.into_iter().collect()) }),
                );
                let mut schema = Value::Object(schema);
                let own = format!("{COMPONENTS_POINTER}{}", escape_pointer(name));
                rewrite_self_refs(&mut schema, &own);
                Some((name.clone(), schema))
            })
            .collect();
        Self {
            version: version.into(),
            schemas,
        }
    }

    /// Canonical version these schemas belong to.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The self-contained schema for `component`.
    pub fn get(&self, component: &str) -> Option<&Value> {
        self.schemas.get(component)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.schemas.contains_key(component)
    }

    /// Component names in sorted order.
    pub fn component_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Point `$ref`s at `own` (or below it) to the document root instead.
fn rewrite_self_refs(value: &mut Value, own: &str) {
    match value {
        Value::Object(obj) => {
            for (key, child) in obj.iter_mut() {
                match child {
                    Value::String(target) if key == "$ref" => {
                        let rewritten = target
                            .strip_prefix(own)
                            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                            .map(|rest| format!("#{rest}"));
                        if let Some(rewritten) = rewritten {
                            *target = rewritten;
                        }
                    }
                    _ => rewrite_self_refs(child, own),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rewrite_self_refs(item, own)),
        _ => {}
    }
}

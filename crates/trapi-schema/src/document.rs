//! # OpenAPI Schema Documents
//!
//! A fetched TRAPI OpenAPI document reduced to what validation needs: the
//! `components.schemas` mapping. YAML documents are converted to JSON
//! values first; OpenAPI YAML uses non-string mapping keys (e.g. `200:`
//! response codes) which are stringified during conversion.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SchemaError;
use crate::node::{escape_pointer, SchemaNode};
use crate::transform::openapi_to_jsonschema;

/// The component schemas of one TRAPI release.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    version: String,
    components: BTreeMap<String, Value>,
}

impl SchemaDocument {
    /// Extract `components.schemas` from a parsed OpenAPI document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedDocument`] if the document has no
    /// `components.schemas` object.
    pub fn from_value(version: &str, document: &Value) -> Result<Self, SchemaError> {
        let schemas = document
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaError::MalformedDocument {
                version: version.to_string(),
                reason: "document has no 'components.schemas' mapping".to_string(),
            })?;
        Ok(Self {
            version: version.to_string(),
            components: schemas.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    /// Parse a YAML (or JSON, which is a YAML subset) OpenAPI document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedDocument`] if the text is not valid
    /// YAML or lacks `components.schemas`.
    pub fn from_yaml_str(version: &str, text: &str) -> Result<Self, SchemaError> {
        let malformed = |reason: String| SchemaError::MalformedDocument {
            version: version.to_string(),
            reason,
        };
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| malformed(format!("invalid YAML: {e}")))?;
        let json = yaml_to_json_value(&yaml)
            .map_err(|e| malformed(format!("YAML-to-JSON conversion failed: {e}")))?;
        Self::from_value(version, &json)
    }

    /// The version this document was fetched for.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Raw component schemas by name.
    pub fn components(&self) -> &BTreeMap<String, Value> {
        &self.components
    }

    /// Every component run through the OpenAPI → JSON-Schema transformer.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedSchema`] with a path under
    /// `/components/schemas/<name>` if a component cannot be parsed.
    pub fn transformed_components(&self) -> Result<BTreeMap<String, Value>, SchemaError> {
        self.components
            .iter()
            .map(|(name, raw)| {
                let base = format!("/components/schemas/{}", escape_pointer(name));
                let node = SchemaNode::parse(raw, &base)?;
                Ok((name.clone(), openapi_to_jsonschema(node).to_value()))
            })
            .collect()
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Mapping keys that are numbers or booleans are stringified, matching how
/// OpenAPI tooling reads response-code keys. YAML tags are dropped.
pub(crate) fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

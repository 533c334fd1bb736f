//! # Schema Node Model
//!
//! A typed view of one OpenAPI/JSON-Schema type definition. The keys the
//! transformer reasons about (`type`, `properties`, `items`, `nullable`,
//! `oneOf`, `anyOf`, `allOf`) are lifted into fields; every other keyword
//! (`$ref`, `required`, `enum`, `additionalProperties`, `description`, ...)
//! is carried verbatim in [`SchemaNode::keywords`].
//!
//! `properties` is only interpreted when `type` is `object` and `items` only
//! when `type` is `array`. On other nodes those keys are kept as plain
//! keywords and left untouched by transformation.
//!
//! `nullable: false` is the OpenAPI default and is not carried through
//! parsing.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// JSON-Schema scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
        }
    }
}

/// The declared shape of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// `type: object`, with its `properties` if declared.
    Object {
        properties: Option<BTreeMap<String, SchemaNode>>,
    },
    /// `type: array`, with its `items` if declared.
    Array { items: Option<Box<SchemaNode>> },
    /// `type: string | integer | number | boolean`.
    Scalar(ScalarType),
    /// `type: null`.
    Null,
    /// No `type`, or a `type` value outside the cases above (kept in `keywords`).
    #[default]
    Untyped,
}

/// One schema definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    pub shape: Shape,
    pub nullable: bool,
    pub one_of: Option<Vec<SchemaNode>>,
    pub any_of: Option<Vec<SchemaNode>>,
    pub all_of: Option<Vec<SchemaNode>>,
    /// Remaining keywords, untouched.
    pub keywords: Map<String, Value>,
}

impl SchemaNode {
    /// `{"type": "null"}`.
    pub fn null() -> Self {
        Self {
            shape: Shape::Null,
            ..Self::default()
        }
    }

    /// Parse a node from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedSchema`] if the value, a property
    /// schema, an `items` schema, or a composition member is not a JSON
    /// object, or if a composition key does not hold an array.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Self::parse(value, "")
    }

    pub(crate) fn parse(value: &Value, path: &str) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or_else(|| SchemaError::MalformedSchema {
            path: display_path(path),
            reason: format!("expected a schema object, found {}", json_kind(value)),
        })?;

        let mut keywords = obj.clone();
        let nullable = matches!(keywords.remove("nullable"), Some(Value::Bool(true)));
        let one_of = take_composition(&mut keywords, "oneOf", path)?;
        let any_of = take_composition(&mut keywords, "anyOf", path)?;
        let all_of = take_composition(&mut keywords, "allOf", path)?;

        let shape = match keywords.get("type").and_then(Value::as_str) {
            Some("object") => {
                keywords.remove("type");
                let properties = match keywords.remove("properties") {
                    None => None,
                    Some(Value::Object(props)) => Some(
                        props
                            .iter()
                            .map(|(name, prop)| {
                                let child = format!("{path}/properties/{}", escape_pointer(name));
                                Self::parse(prop, &child).map(|node| (name.clone(), node))
                            })
                            .collect::<Result<BTreeMap<_, _>, _>>()?,
                    ),
                    Some(other) => {
                        return Err(SchemaError::MalformedSchema {
                            path: display_path(&format!("{path}/properties")),
                            reason: format!("expected an object of schemas, found {}", json_kind(&other)),
                        })
                    }
                };
                Shape::Object { properties }
            }
            Some("array") => {
                keywords.remove("type");
                let items = match keywords.remove("items") {
                    None => None,
                    Some(items) => Some(Box::new(Self::parse(&items, &format!("{path}/items"))?)),
                };
                Shape::Array { items }
            }
            Some("null") => {
                keywords.remove("type");
                Shape::Null
            }
            Some(other) => match scalar_type(other) {
                Some(scalar) => {
                    keywords.remove("type");
                    Shape::Scalar(scalar)
                }
                None => Shape::Untyped,
            },
            None => Shape::Untyped,
        };

        Ok(Self {
            shape,
            nullable,
            one_of,
            any_of,
            all_of,
            keywords,
        })
    }

    /// Render the node back to its JSON form.
    pub fn to_value(&self) -> Value {
        let mut obj = self.keywords.clone();
        match &self.shape {
            Shape::Object { properties } => {
                obj.insert("type".into(), Value::from("object"));
                if let Some(props) = properties {
                    let rendered: Map<String, Value> = props
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_value()))
                        .collect();
                    obj.insert("properties".into(), Value::Object(rendered));
                }
            }
            Shape::Array { items } => {
                obj.insert("type".into(), Value::from("array"));
                if let Some(items) = items {
                    obj.insert("items".into(), items.to_value());
                }
            }
            Shape::Scalar(scalar) => {
                obj.insert("type".into(), Value::from(scalar.as_str()));
            }
            Shape::Null => {
                obj.insert("type".into(), Value::from("null"));
            }
            Shape::Untyped => {}
        }
        if self.nullable {
            obj.insert("nullable".into(), Value::Bool(true));
        }
        for (key, members) in [
            ("oneOf", &self.one_of),
            ("anyOf", &self.any_of),
            ("allOf", &self.all_of),
        ] {
            if let Some(members) = members {
                obj.insert(
                    key.into(),
                    Value::Array(members.iter().map(SchemaNode::to_value).collect()),
                );
            }
        }
        Value::Object(obj)
    }

    /// Whether this node or any node beneath it still carries `nullable` or `allOf`.
    pub fn has_openapi_artifacts(&self) -> bool {
        if self.nullable || self.all_of.is_some() {
            return true;
        }
        let nested = match &self.shape {
            Shape::Object {
                properties: Some(props),
            } => props.values().any(SchemaNode::has_openapi_artifacts),
            Shape::Array { items: Some(items) } => items.has_openapi_artifacts(),
            _ => false,
        };
        nested
            || [&self.one_of, &self.any_of]
                .into_iter()
                .flatten()
                .flatten()
                .any(SchemaNode::has_openapi_artifacts)
    }
}

impl TryFrom<&Value> for SchemaNode {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<&SchemaNode> for Value {
    fn from(node: &SchemaNode) -> Self {
        node.to_value()
    }
}

fn take_composition(
    keywords: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<Vec<SchemaNode>>, SchemaError> {
    match keywords.remove(key) {
        None => Ok(None),
        Some(Value::Array(members)) => members
            .iter()
            .enumerate()
            .map(|(i, member)| SchemaNode::parse(member, &format!("{path}/{key}/{i}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(SchemaError::MalformedSchema {
            path: display_path(&format!("{path}/{key}")),
            reason: format!("expected an array of schemas, found {}", json_kind(&other)),
        }),
    }
}

fn scalar_type(name: &str) -> Option<ScalarType> {
    match name {
        "string" => Some(ScalarType::String),
        "integer" => Some(ScalarType::Integer),
        "number" => Some(ScalarType::Number),
        "boolean" => Some(ScalarType::Boolean),
        _ => None,
    }
}

/// RFC 6901 escaping of one pointer segment.
pub(crate) fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_lifts_structural_keys() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "required": ["message"],
            "properties": {
                "message": {"$ref": "#/components/schemas/Message"},
                "log_level": {"type": "string", "nullable": true}
            }
        }))
        .unwrap();

        let Shape::Object { properties: Some(props) } = &node.shape else {
            panic!("expected object shape, got {:?}", node.shape);
        };
        assert_eq!(props.len(), 2);
        assert_eq!(props["log_level"].shape, Shape::Scalar(ScalarType::String));
        assert!(props["log_level"].nullable);
        assert_eq!(props["message"].shape, Shape::Untyped);
        assert_eq!(node.keywords["required"], json!(["message"]));
    }

    #[test]
    fn test_render_is_lossless() {
        let raw = json!({
            "type": "array",
            "items": {"type": "integer", "minimum": 0},
            "description": "counts",
            "nullable": true,
            "oneOf": [{"maxItems": 3}]
        });
        let node = SchemaNode::from_value(&raw).unwrap();
        assert_eq!(node.to_value(), raw);
    }

    #[test]
    fn test_unknown_type_value_is_kept_verbatim() {
        let raw = json!({"type": ["string", "null"]});
        let node = SchemaNode::from_value(&raw).unwrap();
        assert_eq!(node.shape, Shape::Untyped);
        assert_eq!(node.to_value(), raw);
    }

    #[test]
    fn test_properties_on_non_object_are_plain_keywords() {
        let raw = json!({"type": "string", "properties": {"x": 5}});
        let node = SchemaNode::from_value(&raw).unwrap();
        assert_eq!(node.keywords["properties"], json!({"x": 5}));
    }

    #[test]
    fn test_non_object_property_reports_pointer_path() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {"a/b": {"type": "object", "properties": {"bad": 7}}}
        }))
        .unwrap_err();
        match err {
            SchemaError::MalformedSchema { path, reason } => {
                assert_eq!(path, "/properties/a~1b/properties/bad");
                assert!(reason.contains("a number"), "reason was {reason}");
            }
            other => panic!("expected MalformedSchema, got {other}"),
        }
    }

    #[test]
    fn test_composition_must_be_an_array() {
        let err = SchemaNode::from_value(&json!({"allOf": {"type": "string"}})).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSchema { ref path, .. } if path == "/allOf"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = SchemaNode::from_value(&json!(true)).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSchema { ref path, .. } if path == "/"));
    }

    #[test]
    fn test_artifact_detection_reaches_nested_nodes() {
        let clean = SchemaNode::from_value(&json!({"type": "object", "properties": {"a": {"type": "string"}}})).unwrap();
        assert!(!clean.has_openapi_artifacts());
        let dirty = SchemaNode::from_value(&json!({
            "type": "array",
            "items": {"oneOf": [{"allOf": [{"type": "string"}]}]}
        }))
        .unwrap();
        assert!(dirty.has_openapi_artifacts());
    }
}

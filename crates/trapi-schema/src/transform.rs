//! # OpenAPI → JSON Schema Transformation
//!
//! OpenAPI 3.0 schemas are not valid strict JSON Schema in two ways that
//! matter for TRAPI:
//!
//! 1. `nullable: true` has no JSON-Schema meaning. It is rewritten to a
//!    union with `{"type": "null"}`.
//! 2. TRAPI releases up to 1.3 wrap single references in `allOf` where
//!    `oneOf` is meant. `allOf` is renamed to `oneOf`; this patch can go
//!    once the upstream documents stop using `allOf` that way.
//!
//! The steps run in a fixed order per node: rename `allOf`, transform
//! children (`properties` of objects, `items` of arrays, members of
//! `oneOf`/`anyOf`), then resolve this node's own nullability. Children are
//! therefore already rewritten when a parent is wrapped.
//!
//! The transformation is pure and idempotent: its output carries no
//! `nullable` or `allOf`, so a second pass changes nothing.

use serde_json::Value;

use crate::error::SchemaError;
use crate::node::{SchemaNode, Shape};

/// Rewrite an OpenAPI schema node into strict JSON-Schema form.
pub fn openapi_to_jsonschema(node: SchemaNode) -> SchemaNode {
    let mut node = node;

    if let Some(all_of) = node.all_of.take() {
        node.one_of = Some(all_of);
    }

    node.shape = match node.shape {
        Shape::Object { properties } => Shape::Object {
            properties: properties.map(|props| {
                props
                    .into_iter()
                    .map(|(name, prop)| (name, openapi_to_jsonschema(prop)))
                    .collect()
            }),
        },
        Shape::Array { items } => Shape::Array {
            items: items.map(|items| Box::new(openapi_to_jsonschema(*items))),
        },
        other => other,
    };

    node.one_of = node.one_of.map(transform_members);
    node.any_of = node.any_of.map(transform_members);

    if std::mem::take(&mut node.nullable) {
        fix_nullable(node)
    } else {
        node
    }
}

/// Parse, transform and render a JSON schema value.
///
/// # Errors
///
/// Returns [`SchemaError::MalformedSchema`] if `value` is not a valid schema tree.
pub fn transform_value(value: &Value) -> Result<Value, SchemaError> {
    let node = SchemaNode::from_value(value)?;
    Ok(openapi_to_jsonschema(node).to_value())
}

fn transform_members(members: Vec<SchemaNode>) -> Vec<SchemaNode> {
    members.into_iter().map(openapi_to_jsonschema).collect()
}

/// Add a null alternative to an existing union, or wrap the node in one.
fn fix_nullable(mut node: SchemaNode) -> SchemaNode {
    if let Some(one_of) = node.one_of.as_mut() {
        one_of.push(SchemaNode::null());
        return node;
    }
    if let Some(any_of) = node.any_of.as_mut() {
        any_of.push(SchemaNode::null());
        return node;
    }
    SchemaNode {
        one_of: Some(vec![node, SchemaNode::null()]),
        ..SchemaNode::default()
    }
}

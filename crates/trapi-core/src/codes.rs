//! # Validation Message Catalogue
//!
//! Every message a validator can record has a code from this closed set.
//! Codes are dotted identifiers whose first segment names the level
//! (`info.*`, `warning.*`, `error.*`); [`MessageCode::level`] derives the
//! level from that prefix rather than from a separate table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    /// All levels in report order.
    pub const ALL: [MessageLevel; 3] = [MessageLevel::Info, MessageLevel::Warning, MessageLevel::Error];

    /// The namespace prefix used by codes at this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        }
    }

    /// Parse a level from a code namespace prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "info" => Some(MessageLevel::Info),
            "warning" => Some(MessageLevel::Warning),
            "error" => Some(MessageLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation message code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    /// The message passed every check that was run.
    Compliant,
    /// The knowledge graph has no nodes or no edges.
    EmptyKnowledgeGraph,
    /// A knowledge graph node is not referenced by any edge.
    UnusedNode,
    /// The instance failed JSON-Schema validation.
    SchemaValidation,
    /// A knowledge graph edge lacks a subject or object identifier.
    EdgeEndpointMissing,
    /// A knowledge graph edge references a node id that is not defined.
    DanglingNodeReference,
    /// The input message was empty.
    EmptyMessage,
}

impl MessageCode {
    /// Every code in the catalogue.
    pub const ALL: [MessageCode; 7] = [
        MessageCode::Compliant,
        MessageCode::EmptyKnowledgeGraph,
        MessageCode::UnusedNode,
        MessageCode::SchemaValidation,
        MessageCode::EdgeEndpointMissing,
        MessageCode::DanglingNodeReference,
        MessageCode::EmptyMessage,
    ];

    /// The dotted code identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCode::Compliant => "info.compliant",
            MessageCode::EmptyKnowledgeGraph => "warning.empty_kg",
            MessageCode::UnusedNode => "warning.knowledge_graph.node.unused",
            MessageCode::SchemaValidation => "error.validation",
            MessageCode::EdgeEndpointMissing => "error.knowledge_graph.edge.endpoint_missing",
            MessageCode::DanglingNodeReference => "error.knowledge_graph.edge.dangling_node",
            MessageCode::EmptyMessage => "error.empty_message",
        }
    }

    /// Level taken from the code's namespace prefix.
    pub fn level(&self) -> MessageLevel {
        let prefix = self.as_str().split('.').next().unwrap_or_default();
        // Every catalogue code carries one of the three prefixes; the unit
        // test `test_every_code_has_a_level_prefix` pins this.
        MessageLevel::from_prefix(prefix).unwrap_or(MessageLevel::Error)
    }

    /// Message template; `{key}` placeholders are filled from the context.
    pub fn template(&self) -> &'static str {
        match self {
            MessageCode::Compliant => "The TRAPI message was compliant with the requested schema.",
            MessageCode::EmptyKnowledgeGraph => "The knowledge graph is empty.",
            MessageCode::UnusedNode => "Knowledge graph node '{node_id}' is not referenced by any edge.",
            MessageCode::SchemaValidation => {
                "TRAPI {trapi_version} schema validation of '{component}' failed at '{path}': {reason}"
            }
            MessageCode::EdgeEndpointMissing => {
                "Knowledge graph edge '{edge_id}' has no {role} node identifier."
            }
            MessageCode::DanglingNodeReference => {
                "Knowledge graph edge '{edge_id}' {role} references undefined node '{node_id}'."
            }
            MessageCode::EmptyMessage => "The input message is empty.",
        }
    }

    /// Look up a code by its dotted identifier.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MessageCode::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown message code '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_a_level_prefix() {
        for code in MessageCode::ALL {
            let prefix = code.as_str().split('.').next().unwrap();
            assert!(
                MessageLevel::from_prefix(prefix).is_some(),
                "code {code} has no level prefix"
            );
        }
    }

    #[test]
    fn test_levels_follow_prefix() {
        assert_eq!(MessageCode::Compliant.level(), MessageLevel::Info);
        assert_eq!(MessageCode::EmptyKnowledgeGraph.level(), MessageLevel::Warning);
        assert_eq!(MessageCode::UnusedNode.level(), MessageLevel::Warning);
        assert_eq!(MessageCode::SchemaValidation.level(), MessageLevel::Error);
        assert_eq!(MessageCode::DanglingNodeReference.level(), MessageLevel::Error);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in MessageCode::ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {code}");
        }
    }

    #[test]
    fn test_parse_round_trips_through_serde() {
        let json = serde_json::to_string(&MessageCode::EmptyKnowledgeGraph).unwrap();
        assert_eq!(json, "\"warning.empty_kg\"");
        let back: MessageCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MessageCode::EmptyKnowledgeGraph);
        assert!(serde_json::from_str::<MessageCode>("\"info.bogus\"").is_err());
    }
}

//! # Knowledge Graph Mapping Checks
//!
//! Cross-reference checks between the `nodes` and `edges` of a TRAPI
//! knowledge graph. Operates on the raw JSON payload; no schema is needed.
//!
//! ## Checks
//!
//! 1. If `nodes` or `edges` is absent, null, not an object or empty, record
//!    one `warning.empty_kg` and stop.
//! 2. For each edge (id order), check `subject` then `object`:
//!    - missing or not a string → `error.knowledge_graph.edge.endpoint_missing`
//!    - names an undefined node → `error.knowledge_graph.edge.dangling_node`
//! 3. Every node no edge refers to → `warning.knowledge_graph.node.unused`
//!    (id order).

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use trapi_core::{MessageCode, ValidationReporter};

/// Reporter prefix for mapping checks.
pub const MAPPING_PREFIX: &str = "Knowledge Graph Mapping";

const ENDPOINT_ROLES: [&str; 2] = ["subject", "object"];

/// Checks node/edge cross-references of one knowledge graph.
#[derive(Debug, Clone)]
pub struct MappingValidator {
    reporter: ValidationReporter,
}

impl Default for MappingValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingValidator {
    pub fn new() -> Self {
        Self {
            reporter: ValidationReporter::new(MAPPING_PREFIX),
        }
    }

    pub fn reporter(&self) -> &ValidationReporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> ValidationReporter {
        self.reporter
    }

    /// Run every mapping check on `graph`, recording findings.
    pub fn check_dangling_references(&mut self, graph: &Value) {
        let (Some(nodes), Some(edges)) = (non_empty_map(graph, "nodes"), non_empty_map(graph, "edges")) else {
            self.reporter.report(MessageCode::EmptyKnowledgeGraph);
            return;
        };

        let mut referenced: BTreeSet<&str> = BTreeSet::new();
        for (edge_id, edge) in edges {
            for role in ENDPOINT_ROLES {
                match edge.get(role).and_then(Value::as_str) {
                    None => self.reporter.report_with_context(
                        MessageCode::EdgeEndpointMissing,
                        [("edge_id", edge_id.as_str()), ("role", role)],
                    ),
                    Some(node_id) if !nodes.contains_key(node_id) => self.reporter.report_with_context(
                        MessageCode::DanglingNodeReference,
                        [("edge_id", edge_id.as_str()), ("role", role), ("node_id", node_id)],
                    ),
                    Some(node_id) => {
                        referenced.insert(node_id);
                    }
                }
            }
        }

        for node_id in nodes.keys().filter(|id| !referenced.contains(id.as_str())) {
            self.reporter
                .report_with_context(MessageCode::UnusedNode, [("node_id", node_id.as_str())]);
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            errors = self.reporter.messages(trapi_core::MessageLevel::Error).len(),
            "mapping check finished"
        );
    }
}

/// Run the mapping checks on `graph` with a fresh validator and return its reporter.
pub fn check_node_edge_mappings(graph: &Value) -> ValidationReporter {
    let mut validator = MappingValidator::new();
    validator.check_dangling_references(graph);
    validator.into_reporter()
}

fn non_empty_map<'a>(graph: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    graph.get(key).and_then(Value::as_object).filter(|m| !m.is_empty())
}

//! # Check-Mappings Subcommand
//!
//! Runs only the knowledge-graph mapping checks. The input file is either a
//! bare knowledge graph (`{"nodes": ..., "edges": ...}`) or a TRAPI payload,
//! in which case `message.knowledge_graph` is checked.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use trapi_core::ValidationReporter;
use trapi_validator::check_node_edge_mappings;

/// Arguments for the `trapi check-mappings` subcommand.
#[derive(Args, Debug)]
pub struct CheckMappingsArgs {
    /// JSON file holding a knowledge graph or a TRAPI message.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Print a text summary instead of JSON.
    #[arg(long)]
    pub text: bool,
}

/// Execute the check-mappings subcommand.
pub fn run_check_mappings(args: &CheckMappingsArgs) -> Result<u8> {
    let reporter = check_mappings_file(args)?;
    crate::print_report(&reporter, args.text)?;
    Ok(crate::exit_code(&reporter))
}

/// Run the mapping checks on the file named by `args`.
pub fn check_mappings_file(args: &CheckMappingsArgs) -> Result<ValidationReporter> {
    let input = crate::read_json_file(&args.path)?;
    let mut reporter = check_node_edge_mappings(knowledge_graph(&input));
    crate::mark_compliant_if_clean(&mut reporter);
    Ok(reporter)
}

fn knowledge_graph(input: &Value) -> &Value {
    input.pointer("/message/knowledge_graph").unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trapi_core::{MessageCode, MessageLevel};

    #[test]
    fn knowledge_graph_is_found_inside_a_message() {
        let graph = json!({"nodes": {}, "edges": {}});
        assert_eq!(knowledge_graph(&graph), &graph);
        let payload = json!({"message": {"knowledge_graph": {"nodes": {"n": {}}}}});
        assert_eq!(knowledge_graph(&payload), &json!({"nodes": {"n": {}}}));
    }

    #[test]
    fn check_mappings_reports_dangling_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kg.json");
        std::fs::write(
            &path,
            json!({"nodes": {"n1": {}}, "edges": {"e1": {"subject": "n1", "object": "n2"}}}).to_string(),
        )
        .unwrap();

        let reporter = check_mappings_file(&CheckMappingsArgs { path, text: true }).unwrap();
        let errors = reporter.messages(MessageLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, MessageCode::DanglingNodeReference);
        assert_eq!(crate::exit_code(&reporter), 1);
    }
}

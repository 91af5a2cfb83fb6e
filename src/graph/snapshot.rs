use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::core::node::{Edge, Node};
use crate::error::{DepscopeError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .context("graph snapshot is not valid JSON")
            .map_err(DepscopeError::Other)?;

        let nodes = match value.get("nodes") {
            Some(nodes @ Value::Array(_)) => serde_json::from_value(nodes.clone())
                .map_err(|_| DepscopeError::InvalidNodes)?,
            _ => return Err(DepscopeError::InvalidNodes),
        };
        let edges = match value.get("edges") {
            Some(edges @ Value::Array(_)) => serde_json::from_value(edges.clone())
                .map_err(|_| DepscopeError::InvalidEdges)?,
            _ => return Err(DepscopeError::InvalidEdges),
        };

        Ok(Self { nodes, edges })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::node::Node;
    use crate::error::DepscopeError;
    use crate::graph::snapshot::GraphSnapshot;

    #[test]
    fn parses_tuple_encoded_snapshot() {
        let snapshot = GraphSnapshot::from_json(
            r#"{
                "nodes": [["app", "1.0"], ["lib", "2.1"]],
                "edges": [[["root", "0.0.0"], ["app", "1.0"]], [["app", "1.0"], ["lib", "2.1"]]]
            }"#,
        )
        .expect("parse snapshot");
        assert_eq!(snapshot.nodes, vec![Node::new("app", "1.0"), Node::new("lib", "2.1")]);
        assert_eq!(snapshot.edges.len(), 2);
        assert!(snapshot.edges[0].touches_root());
    }

    #[test]
    fn rejects_missing_or_malformed_collections() {
        let err = GraphSnapshot::from_json(r#"{"nodes": 3, "edges": []}"#).expect_err("nodes");
        assert!(matches!(err, DepscopeError::InvalidNodes));

        let err = GraphSnapshot::from_json(r#"{"nodes": [["a"]], "edges": []}"#).expect_err("nodes");
        assert!(matches!(err, DepscopeError::InvalidNodes));

        let err = GraphSnapshot::from_json(r#"{"nodes": []}"#).expect_err("edges");
        assert!(matches!(err, DepscopeError::InvalidEdges));

        let err = GraphSnapshot::from_json("not json").expect_err("json");
        assert!(matches!(err, DepscopeError::Other(_)));
    }

    #[test]
    fn empty_edge_list_is_accepted_at_load_time() {
        let snapshot =
            GraphSnapshot::from_json(r#"{"nodes": [["a", "1"]], "edges": []}"#).expect("parse");
        assert!(snapshot.edges.is_empty());
    }
}

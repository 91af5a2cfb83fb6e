use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::core::node::{Edge, NodeKey};
use crate::error::{DepscopeError, Result};

pub fn direct_links<'a>(key: &NodeKey, edges: &'a [Edge]) -> Result<(Vec<&'a Edge>, Vec<&'a Edge>)> {
    if edges.is_empty() {
        return Err(DepscopeError::InvalidEdges);
    }
    let ancestors = edges
        .iter()
        .filter(|edge| edge.to_node().key() == *key)
        .collect();
    let descendants = edges
        .iter()
        .filter(|edge| edge.from_node().key() == *key)
        .collect();
    Ok((ancestors, descendants))
}

#[derive(Debug, Default)]
pub struct LinkIndex<'a> {
    ancestors: HashMap<NodeKey, Vec<&'a Edge>>,
    descendants: HashMap<NodeKey, Vec<&'a Edge>>,
}

impl<'a> LinkIndex<'a> {
    pub fn build(edges: &'a [Edge]) -> Result<Self> {
        if edges.is_empty() {
            return Err(DepscopeError::InvalidEdges);
        }
        let mut index = Self::default();
        for edge in edges {
            index
                .ancestors
                .entry(edge.to_node().key())
                .or_default()
                .push(edge);
            index
                .descendants
                .entry(edge.from_node().key())
                .or_default()
                .push(edge);
        }
        Ok(index)
    }

    pub fn ancestors(&self, key: &NodeKey) -> &[&'a Edge] {
        self.ancestors.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn descendants(&self, key: &NodeKey) -> &[&'a Edge] {
        self.descendants.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    Undirected,
    Ancestors,
}

pub(crate) fn propagate(
    origin: &NodeKey,
    levels: &mut HashMap<NodeKey, Option<usize>>,
    links: &LinkIndex<'_>,
    walk: Walk,
    include_root: bool,
) {
    let mut touched: HashSet<NodeKey> = HashSet::new();
    let mut frontier = vec![origin.clone()];
    let mut level = 0usize;

    while !frontier.is_empty() {
        trace!(level, size = frontier.len(), "expanding frontier");
        let mut next = Vec::new();
        let mut queued: HashSet<NodeKey> = HashSet::new();

        for key in &frontier {
            // levels only ever go down
            if let Some(slot) = levels.get_mut(key) {
                if slot.map_or(true, |current| current > level) {
                    *slot = Some(level);
                }
            }
            touched.insert(key.clone());

            let upstream = links
                .ancestors(key)
                .iter()
                .filter(|edge| include_root || !edge.touches_root())
                .map(|edge| edge.from_node());
            let descendants: &[&Edge] = match walk {
                Walk::Undirected => links.descendants(key),
                Walk::Ancestors => &[],
            };
            let downstream = descendants
                .iter()
                .filter(|edge| include_root || !edge.touches_root())
                .map(|edge| edge.to_node());

            for neighbour in downstream.chain(upstream) {
                let neighbour = neighbour.key();
                if !levels.contains_key(&neighbour) || touched.contains(&neighbour) {
                    continue;
                }
                if queued.insert(neighbour.clone()) {
                    next.push(neighbour);
                }
            }
        }

        frontier = next;
        level += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::core::node::{Edge, Node, NodeKey};
    use crate::error::DepscopeError;
    use crate::graph::ops::{direct_links, LinkIndex};

    fn edge(from: &str, to: &str) -> Edge {
        Edge::new(Node::new(from, "1.0"), Node::new(to, "1.0"))
    }

    #[test]
    fn direct_links_split_by_edge_side() {
        let edges = vec![edge("app", "Lib"), edge("lib", "core"), edge("tool", "core")];
        let (ancestors, descendants) =
            direct_links(&NodeKey::new("LIB"), &edges).expect("direct links");
        assert_eq!(ancestors, vec![&edges[0]]);
        assert_eq!(descendants, vec![&edges[1]]);

        let (ancestors, descendants) =
            direct_links(&NodeKey::new("core"), &edges).expect("direct links");
        assert_eq!(ancestors.len(), 2);
        assert!(descendants.is_empty());
    }

    #[test]
    fn empty_edges_are_rejected() {
        let err = direct_links(&NodeKey::new("app"), &[]).expect_err("empty edges");
        assert!(matches!(err, DepscopeError::InvalidEdges));
        assert!(matches!(
            LinkIndex::build(&[]).expect_err("empty edges"),
            DepscopeError::InvalidEdges
        ));
    }

    #[test]
    fn link_index_agrees_with_direct_links() {
        let edges = vec![edge("app", "lib"), edge("lib", "core"), edge("App", "core")];
        let index = LinkIndex::build(&edges).expect("index");
        for name in ["app", "lib", "core", "missing"] {
            let key = NodeKey::new(name);
            let (ancestors, descendants) = direct_links(&key, &edges).expect("direct links");
            assert_eq!(index.ancestors(&key), ancestors.as_slice());
            assert_eq!(index.descendants(&key), descendants.as_slice());
        }
    }
}

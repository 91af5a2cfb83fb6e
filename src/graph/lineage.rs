use tracing::debug;

use crate::core::node::{Edge, Node, NodeKey};
use crate::error::Result;
use crate::graph::distance::{collect, initial_levels, DistanceMap, OutputShape};
use crate::graph::ops::{propagate, LinkIndex, Walk};

pub fn trace_lineage(
    origin: &str,
    nodes: &[Node],
    edges: &[Edge],
    keep_unreached: bool,
) -> Result<DistanceMap> {
    let origin = NodeKey::new(origin);
    let mut levels = initial_levels(nodes, true);
    if !levels.contains_key(&origin) {
        debug!(origin = %origin, "origin not in node set");
        return Ok(DistanceMap::empty(OutputShape::Map));
    }

    let links = LinkIndex::build(edges)?;
    propagate(&origin, &mut levels, &links, Walk::Ancestors, true);

    Ok(collect(nodes, &levels, keep_unreached, true, OutputShape::Map))
}

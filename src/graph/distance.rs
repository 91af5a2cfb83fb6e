use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::core::node::{Edge, Node, NodeKey};
use crate::error::Result;
use crate::graph::ops::{propagate, LinkIndex, Walk};

pub const UNREACHED: i64 = -999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum OutputShape {
    List,
    #[default]
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDistance {
    pub name: String,
    pub version: String,
    pub distance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceMap {
    List(Vec<NodeDistance>),
    Map(BTreeMap<Node, i64>),
}

impl DistanceMap {
    pub fn empty(shape: OutputShape) -> Self {
        match shape {
            OutputShape::List => Self::List(Vec::new()),
            OutputShape::Map => Self::Map(BTreeMap::new()),
        }
    }

    pub fn shape(&self) -> OutputShape {
        match self {
            Self::List(_) => OutputShape::List,
            Self::Map(_) => OutputShape::Map,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::List(rows) => rows.len(),
            Self::Map(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn distance_of(&self, name: &str) -> Option<i64> {
        let key = NodeKey::new(name);
        match self {
            Self::List(rows) => rows
                .iter()
                .find(|row| NodeKey::new(&row.name) == key)
                .map(|row| row.distance),
            Self::Map(map) => map
                .iter()
                .find(|(node, _)| node.key() == key)
                .map(|(_, distance)| *distance),
        }
    }

    pub fn entries(&self) -> Vec<NodeDistance> {
        match self {
            Self::List(rows) => rows.clone(),
            Self::Map(map) => map
                .iter()
                .map(|(node, distance)| NodeDistance {
                    name: node.name.clone(),
                    version: node.version.clone(),
                    distance: *distance,
                })
                .collect(),
        }
    }

    pub fn reached(&self) -> Vec<NodeDistance> {
        self.entries()
            .into_iter()
            .filter(|row| row.distance != UNREACHED)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistanceOptions {
    pub include_root: bool,
    pub keep_unreached: bool,
    pub shape: OutputShape,
}

pub fn compute_distances(
    origin: &str,
    nodes: &[Node],
    edges: &[Edge],
    options: DistanceOptions,
) -> Result<DistanceMap> {
    let origin = NodeKey::new(origin);
    let mut levels = initial_levels(nodes, options.include_root);
    if !levels.contains_key(&origin) {
        debug!(origin = %origin, "origin not in node set");
        return Ok(DistanceMap::empty(options.shape));
    }

    let links = LinkIndex::build(edges)?;
    propagate(
        &origin,
        &mut levels,
        &links,
        Walk::Undirected,
        options.include_root,
    );
    debug!(
        origin = %origin,
        reached = levels.values().filter(|level| level.is_some()).count(),
        "computed distances"
    );

    Ok(collect(
        nodes,
        &levels,
        options.keep_unreached,
        options.include_root,
        options.shape,
    ))
}

pub(crate) fn initial_levels(
    nodes: &[Node],
    include_root: bool,
) -> HashMap<NodeKey, Option<usize>> {
    let mut levels: HashMap<NodeKey, Option<usize>> = nodes
        .iter()
        .filter(|node| include_root || !node.is_root())
        .map(|node| (node.key(), None))
        .collect();
    if include_root {
        levels.insert(NodeKey::root(), None);
    }
    levels
}

fn to_distance(level: Option<usize>) -> i64 {
    level
        .and_then(|level| i64::try_from(level).ok())
        .unwrap_or(UNREACHED)
}

pub(crate) fn collect(
    nodes: &[Node],
    levels: &HashMap<NodeKey, Option<usize>>,
    keep_unreached: bool,
    include_root: bool,
    shape: OutputShape,
) -> DistanceMap {
    let mut rows: Vec<(Node, i64)> = nodes
        .iter()
        .filter(|node| include_root || !node.is_root())
        .map(|node| {
            let level = levels.get(&node.key()).copied().flatten();
            (node.clone(), to_distance(level))
        })
        // A requested root is reported even when the walk never reached it.
        .filter(|(node, distance)| {
            keep_unreached || *distance != UNREACHED || (include_root && node.is_root())
        })
        .collect();

    if include_root && !nodes.iter().any(Node::is_root) {
        let level = levels.get(&NodeKey::root()).copied().flatten();
        rows.push((Node::root(), to_distance(level)));
    }

    match shape {
        OutputShape::List => DistanceMap::List(
            rows.into_iter()
                .map(|(node, distance)| NodeDistance {
                    name: node.name,
                    version: node.version,
                    distance,
                })
                .collect(),
        ),
        OutputShape::Map => DistanceMap::Map(rows.into_iter().collect()),
    }
}

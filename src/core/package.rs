use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::core::node::{Edge, Node, NodeKey};
use crate::core::staleness::{classify, VersionVerdict};
use crate::error::Result;
use crate::graph::distance::{compute_distances, DistanceMap, DistanceOptions, OutputShape};
use crate::graph::lineage::trace_lineage;
use crate::graph::ops::direct_links;
use crate::graph::snapshot::GraphSnapshot;
use crate::index::PackageIndex;
use crate::util::parallel::run_in_parallel;

#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub key: NodeKey,
    pub version: Option<String>,
    distances: HashMap<OutputShape, DistanceMap>,
    lineage: Option<DistanceMap>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        let name = name.into();
        Self {
            key: NodeKey::new(&name),
            name,
            version,
            distances: HashMap::new(),
            lineage: None,
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::new(node.name.clone(), Some(node.version.clone()))
    }

    pub fn ancestors<'a>(&self, edges: &'a [Edge]) -> Result<Vec<&'a Edge>> {
        direct_links(&self.key, edges).map(|(ancestors, _)| ancestors)
    }

    pub fn descendants<'a>(&self, edges: &'a [Edge]) -> Result<Vec<&'a Edge>> {
        direct_links(&self.key, edges).map(|(_, descendants)| descendants)
    }

    pub fn direct_links<'a>(&self, edges: &'a [Edge]) -> Result<(Vec<&'a Edge>, Vec<&'a Edge>)> {
        direct_links(&self.key, edges)
    }

    pub fn node_distances(
        &mut self,
        snapshot: &GraphSnapshot,
        options: DistanceOptions,
        force: bool,
    ) -> Result<&DistanceMap> {
        let compute = || compute_distances(&self.name, &snapshot.nodes, &snapshot.edges, options);
        match self.distances.entry(options.shape) {
            Entry::Occupied(mut slot) => {
                if force || slot.get().is_empty() {
                    slot.insert(compute()?);
                }
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(compute()?)),
        }
    }

    pub fn ancestor_trace(
        &mut self,
        snapshot: &GraphSnapshot,
        keep_unreached: bool,
        force: bool,
    ) -> Result<&DistanceMap> {
        let reuse = !force && self.lineage.as_ref().is_some_and(|trace| !trace.is_empty());
        if !reuse {
            let trace = trace_lineage(&self.name, &snapshot.nodes, &snapshot.edges, keep_unreached)?;
            self.lineage = Some(trace);
        }
        Ok(self.lineage.get_or_insert_with(|| DistanceMap::empty(OutputShape::Map)))
    }

    pub fn check_versions(&self, index: &dyn PackageIndex) -> VersionVerdict {
        classify(index, &self.name, self.version.as_deref())
    }

    pub fn clear_cache(&mut self) {
        self.distances.clear();
        self.lineage = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVerdict {
    pub package: String,
    pub version: Option<String>,
    pub verdict: VersionVerdict,
}

pub fn check_outdated_packages(
    packages: &[&Package],
    index: &dyn PackageIndex,
    jobs: Option<usize>,
) -> Vec<PackageVerdict> {
    run_in_parallel(packages.to_vec(), jobs, |package| PackageVerdict {
        package: package.name.clone(),
        version: package.version.clone(),
        verdict: package.check_versions(index),
    })
}

#[cfg(test)]
mod tests {
    use crate::core::node::{Edge, Node};
    use crate::core::package::{check_outdated_packages, Package};
    use crate::core::staleness::VerdictStatus;
    use crate::graph::distance::{DistanceOptions, OutputShape};
    use crate::graph::snapshot::GraphSnapshot;
    use crate::index::FixedIndex;

    fn snapshot() -> GraphSnapshot {
        let node = |name: &str| Node::new(name, "1.0");
        GraphSnapshot::new(
            vec![node("app"), node("lib"), node("core")],
            vec![
                Edge::new(Node::root(), node("app")),
                Edge::new(node("app"), node("lib")),
                Edge::new(node("lib"), node("core")),
            ],
        )
    }

    #[test]
    fn caches_distances_per_shape_until_forced() {
        let graph = snapshot();
        let mut package = Package::new("Lib", Some("1.0".to_string()));
        let map = package
            .node_distances(&graph, DistanceOptions::default(), false)
            .expect("map")
            .clone();
        assert_eq!(map.distance_of("core"), Some(1));

        let list_options = DistanceOptions {
            shape: OutputShape::List,
            ..DistanceOptions::default()
        };
        let list = package
            .node_distances(&graph, list_options, false)
            .expect("list")
            .clone();
        assert_eq!(list.shape(), OutputShape::List);

        // A different graph is ignored until the caller forces a recompute.
        let mut shrunk = graph.clone();
        shrunk.edges.truncate(2);
        let cached = package
            .node_distances(&shrunk, DistanceOptions::default(), false)
            .expect("cached");
        assert_eq!(cached, &map);
        let forced = package
            .node_distances(&shrunk, DistanceOptions::default(), true)
            .expect("forced");
        assert_eq!(forced.distance_of("core"), None);
    }

    #[test]
    fn forced_recompute_on_same_graph_matches_cache() {
        let graph = snapshot();
        let mut package = Package::new("core", None);
        let first = package.ancestor_trace(&graph, false, false).expect("trace").clone();
        let forced = package.ancestor_trace(&graph, false, true).expect("trace").clone();
        assert_eq!(first, forced);
        assert_eq!(first.distance_of("app"), Some(2));
        assert_eq!(first.distance_of("root"), Some(3));
    }

    #[test]
    fn direct_link_accessors_use_own_key() {
        let graph = snapshot();
        let package = Package::new("LIB", None);
        let ancestors = package.ancestors(&graph.edges).expect("ancestors");
        let descendants = package.descendants(&graph.edges).expect("descendants");
        assert_eq!(ancestors, vec![&graph.edges[1]]);
        assert_eq!(descendants, vec![&graph.edges[2]]);
        assert!(package.direct_links(&[]).is_err());
    }

    #[test]
    fn checks_several_packages_in_order() {
        let index = FixedIndex::new()
            .with_package("app", &["1.0", "2.0"])
            .with_package("lib", &["1.0"]);
        let app = Package::new("app", Some("1.0".to_string()));
        let lib = Package::new("lib", Some("1.0".to_string()));
        let gone = Package::new("gone", Some("1.0".to_string()));

        let verdicts = check_outdated_packages(&[&app, &lib, &gone], &index, Some(3));
        let statuses: Vec<VerdictStatus> = verdicts.iter().map(|v| v.verdict.status).collect();
        assert_eq!(
            statuses,
            vec![
                VerdictStatus::Outdated,
                VerdictStatus::UpToDate,
                VerdictStatus::LookupFailed,
            ]
        );
    }
}

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::core::node::{Edge, Node, NodeKey};
use crate::core::package::Package;
use crate::error::Result;
use crate::graph::distance::{DistanceMap, DistanceOptions};
use crate::graph::snapshot::GraphSnapshot;

#[derive(Debug, Clone)]
pub struct Environment {
    pub snapshot: GraphSnapshot,
    packages: BTreeMap<NodeKey, Package>,
}

impl Environment {
    pub fn new(snapshot: GraphSnapshot) -> Self {
        let packages = snapshot
            .nodes
            .iter()
            .filter(|node| !node.is_root())
            .map(|node| (node.key(), Package::from_node(node)))
            .collect();
        Self { snapshot, packages }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(GraphSnapshot::load(path)?))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.snapshot.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.snapshot.edges
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(&NodeKey::new(name))
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn installed(&self) -> BTreeMap<NodeKey, String> {
        self.packages
            .iter()
            .filter_map(|(key, package)| {
                package
                    .version
                    .as_ref()
                    .map(|version| (key.clone(), version.clone()))
            })
            .collect()
    }

    pub fn distances_for(
        &mut self,
        name: &str,
        options: DistanceOptions,
        force: bool,
    ) -> Result<Option<&DistanceMap>> {
        let Self { snapshot, packages } = self;
        match packages.get_mut(&NodeKey::new(name)) {
            Some(package) => package.node_distances(snapshot, options, force).map(Some),
            None => Ok(None),
        }
    }

    pub fn lineage_for(
        &mut self,
        name: &str,
        keep_unreached: bool,
        force: bool,
    ) -> Result<Option<&DistanceMap>> {
        let Self { snapshot, packages } = self;
        match packages.get_mut(&NodeKey::new(name)) {
            Some(package) => package
                .ancestor_trace(snapshot, keep_unreached, force)
                .map(Some),
            None => Ok(None),
        }
    }

    pub fn resolve_package_list(&self, packages: &[String], package_file: Option<&Path>) -> Vec<String> {
        let mut names: Vec<String> = packages.to_vec();
        if let Some(path) = package_file {
            match fs::read_to_string(path) {
                Ok(content) => names.extend(
                    content
                        .split(|ch: char| ch == ',' || ch.is_whitespace())
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                ),
                Err(err) => warn!(path = %path.display(), error = %err, "package file not readable"),
            }
        }

        let mut seen: HashSet<NodeKey> = HashSet::new();
        let mut resolved = Vec::new();
        for name in names {
            let key = NodeKey::new(&name);
            if !seen.insert(key.clone()) {
                continue;
            }
            if !self.packages.contains_key(&key) {
                warn!(package = %name, "not found in environment, dropping");
                continue;
            }
            resolved.push(name);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::core::environment::Environment;
    use crate::core::node::{Edge, Node, NodeKey};
    use crate::graph::distance::DistanceOptions;
    use crate::graph::snapshot::GraphSnapshot;

    fn environment() -> Environment {
        Environment::new(GraphSnapshot::new(
            vec![Node::root(), Node::new("Flask", "2.3.0"), Node::new("click", "8.1.7")],
            vec![
                Edge::new(Node::root(), Node::new("Flask", "2.3.0")),
                Edge::new(Node::new("Flask", "2.3.0"), Node::new("click", "8.1.7")),
            ],
        ))
    }

    #[test]
    fn installed_excludes_root() {
        let env = environment();
        let installed = env.installed();
        assert_eq!(installed.len(), 2);
        assert_eq!(installed.get(&NodeKey::new("flask")).map(String::as_str), Some("2.3.0"));
        assert!(env.package("root").is_none());
    }

    #[test]
    fn distances_and_lineage_go_through_package_cache() {
        let mut env = environment();
        let distances = env
            .distances_for("click", DistanceOptions::default(), false)
            .expect("distances")
            .expect("installed");
        assert_eq!(distances.distance_of("flask"), Some(1));

        let lineage = env
            .lineage_for("CLICK", false, false)
            .expect("lineage")
            .expect("installed");
        assert_eq!(lineage.distance_of("root"), Some(2));

        assert!(env
            .distances_for("ghost", DistanceOptions::default(), false)
            .expect("distances")
            .is_none());
    }

    #[test]
    fn resolves_package_list_from_args_and_file() {
        let env = environment();
        let path = std::env::temp_dir().join(format!(
            "depscope-packages-{}-{}.txt",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock before unix epoch")
                .as_nanos()
        ));
        fs::write(&path, "click, ghost\nFLASK\n").expect("write package file");

        let resolved = env.resolve_package_list(&["flask".to_string()], Some(&path));
        assert_eq!(resolved, vec!["flask".to_string(), "click".to_string()]);

        let missing = std::env::temp_dir().join("depscope-no-such-package-file.txt");
        let resolved = env.resolve_package_list(&["click".to_string()], Some(&missing));
        assert_eq!(resolved, vec!["click".to_string()]);
        let _ = fs::remove_file(&path);
    }
}

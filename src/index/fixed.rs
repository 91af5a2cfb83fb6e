use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::node::NodeKey;
use crate::index::{IndexError, PackageIndex};

#[derive(Debug, Clone, Default)]
pub struct FixedIndex {
    releases: HashMap<NodeKey, Vec<String>>,
}

impl FixedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: &str, versions: &[&str]) -> Self {
        self.insert(package, versions.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn insert(&mut self, package: &str, versions: Vec<String>) {
        self.releases.insert(NodeKey::new(package), versions);
    }

    pub fn from_json(content: &str) -> Result<Self, IndexError> {
        let parsed: HashMap<String, Vec<String>> =
            serde_json::from_str(content).map_err(|err| IndexError::Decode {
                package: "<index file>".to_string(),
                message: err.to_string(),
            })?;
        let mut index = Self::new();
        for (package, versions) in parsed {
            index.insert(&package, versions);
        }
        Ok(index)
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl PackageIndex for FixedIndex {
    fn release_versions(&self, package: &str) -> Result<Vec<String>, IndexError> {
        self.releases
            .get(&NodeKey::new(package))
            .cloned()
            .ok_or_else(|| IndexError::NotFound(package.to_string()))
    }
}

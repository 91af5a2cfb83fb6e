use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::node::NodeKey;
use crate::manifest::ManifestEntry;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ManifestVersion {
    Pinned(String),
    Unversioned,
}

impl ManifestVersion {
    pub fn from_entry(entry: &ManifestEntry) -> Self {
        match entry.pinned_version() {
            Some(version) => ManifestVersion::Pinned(version.to_string()),
            None => ManifestVersion::Unversioned,
        }
    }

    pub fn matches(&self, installed: &str) -> bool {
        matches!(self, ManifestVersion::Pinned(version) if version == installed)
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestVersion::Pinned(version) => f.write_str(version),
            ManifestVersion::Unversioned => f.write_str("(unversioned)"),
        }
    }
}

impl Serialize for ManifestVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ManifestVersion::Pinned(version) => serializer.serialize_some(version),
            ManifestVersion::Unversioned => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersion {
    pub package: NodeKey,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDiff {
    pub package: NodeKey,
    pub manifest: ManifestVersion,
    pub environment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub same: Vec<PackageVersion>,
    pub version_diff: Vec<VersionDiff>,
    pub manifest_only: Vec<NodeKey>,
    pub environment_only: Vec<NodeKey>,
}

pub fn reconcile(
    manifest: &[ManifestEntry],
    environment: &BTreeMap<NodeKey, String>,
) -> ReconciliationResult {
    let declared: BTreeMap<&NodeKey, ManifestVersion> = manifest
        .iter()
        .map(|entry| (&entry.key, ManifestVersion::from_entry(entry)))
        .collect();

    let mut result = ReconciliationResult::default();
    for (key, declared_version) in &declared {
        let Some(installed) = environment.get(*key) else {
            result.manifest_only.push((*key).clone());
            continue;
        };
        if declared_version.matches(installed) {
            result.same.push(PackageVersion {
                package: (*key).clone(),
                version: installed.clone(),
            });
        } else {
            result.version_diff.push(VersionDiff {
                package: (*key).clone(),
                manifest: declared_version.clone(),
                environment: installed.clone(),
            });
        }
    }

    result.environment_only = environment
        .keys()
        .filter(|key| !declared.contains_key(key))
        .cloned()
        .collect();

    result
}

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROOT_NAME: &str = "root";
pub const ROOT_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn root() -> Self {
        Self(ROOT_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_NAME
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Node {
    pub name: String,
    pub version: String,
}

impl Node {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_NAME, ROOT_VERSION)
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(&self.name)
    }

    pub fn is_root(&self) -> bool {
        self.key().is_root()
    }
}

impl From<(String, String)> for Node {
    fn from((name, version): (String, String)) -> Self {
        Self { name, version }
    }
}

impl From<Node> for (String, String) {
    fn from(node: Node) -> Self {
        (node.name, node.version)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub Node, pub Node);

impl Edge {
    pub fn new(from: Node, to: Node) -> Self {
        Self(from, to)
    }

    pub fn from_node(&self) -> &Node {
        &self.0
    }

    pub fn to_node(&self) -> &Node {
        &self.1
    }

    pub fn touches_root(&self) -> bool {
        self.0.is_root() || self.1.is_root()
    }
}

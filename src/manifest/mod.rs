pub mod check;
pub mod parse;
pub mod reconcile;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::core::node::NodeKey;

pub use check::{check_outdated_manifest, ManifestVerdict};
pub use parse::parse_manifest;
pub use reconcile::{reconcile, ManifestVersion, ReconciliationResult, VersionDiff};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed requirement on line {line}: '{content}'")]
    Malformed { line: usize, content: String },
    #[error("invalid requirement pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    ArbitraryEqual,
    Equal,
    Compatible,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::Equal => "==",
            Operator::Compatible => "~=",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "===" => Some(Operator::ArbitraryEqual),
            "==" => Some(Operator::Equal),
            "~=" => Some(Operator::Compatible),
            "!=" => Some(Operator::NotEqual),
            "<=" => Some(Operator::LessEqual),
            ">=" => Some(Operator::GreaterEqual),
            "<" => Some(Operator::Less),
            ">" => Some(Operator::Greater),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub op: Operator,
    pub version: String,
}

impl Constraint {
    pub fn new(op: Operator, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub key: NodeKey,
    pub name: String,
    pub constraints: Vec<Constraint>,
}

impl ManifestEntry {
    pub fn new(name: impl Into<String>, constraints: Vec<Constraint>) -> Self {
        let name = name.into();
        Self {
            key: NodeKey::new(&name),
            name,
            constraints,
        }
    }

    pub fn pinned_version(&self) -> Option<&str> {
        self.constraints
            .iter()
            .rev()
            .find(|constraint| constraint.op == Operator::Equal)
            .map(|constraint| constraint.version.as_str())
    }
}

pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content)
}

pub fn read_manifest(path: &Path) -> Result<Option<Vec<ManifestEntry>>, ManifestError> {
    match load_manifest(path) {
        Ok(entries) => Ok(Some(entries)),
        Err(err @ ManifestError::Read { .. }) => {
            warn!(error = %err, "manifest unavailable");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

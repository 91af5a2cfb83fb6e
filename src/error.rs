use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DepscopeError {
    #[error("invalid nodes: node collection is missing or not a sequence")]
    InvalidNodes,
    #[error("invalid edges: edge collection is missing or empty")]
    InvalidEdges,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DepscopeError>;

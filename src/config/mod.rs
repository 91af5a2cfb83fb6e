pub mod resolve;
pub mod settings;

pub use settings::{AnalysisSettings, IndexSettings, OutputSettings, Settings};

use std::path::PathBuf;

use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "depscope.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

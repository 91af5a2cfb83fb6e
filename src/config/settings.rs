use serde::Deserialize;

use crate::index::pypi::DEFAULT_INDEX_URL;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub index: IndexSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_index_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub include_root: bool,
    #[serde(default)]
    pub keep_unreached: bool,
    #[serde(default)]
    pub parallel: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub color: Option<bool>,
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("depscope/{}", env!("CARGO_PKG_VERSION"))
}

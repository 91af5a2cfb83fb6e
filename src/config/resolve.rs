use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigError, Settings, CONFIG_FILE_NAME};

pub const CONFIG_ENV: &str = "DEPSCOPE_CONFIG";
pub const INDEX_URL_ENV: &str = "DEPSCOPE_INDEX_URL";

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub path: Option<PathBuf>,
    pub settings: Settings,
}

pub fn resolve_settings(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let explicit = config_path.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
    let path = match explicit {
        Some(path) => Some(path),
        None => find_config_from(start.as_ref()),
    };

    let mut settings = match path.as_deref() {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);
    debug!(config = ?path, index = %settings.index.url, "resolved settings");

    Ok(ResolvedConfig { path, settings })
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = env::var(INDEX_URL_ENV) {
        if !url.trim().is_empty() {
            settings.index.url = url;
        }
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

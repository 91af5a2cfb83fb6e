pub mod fixed;
pub mod pypi;

use thiserror::Error;

use crate::core::version::sort_versions;

pub use fixed::FixedIndex;
pub use pypi::PypiClient;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response for '{package}': {message}")]
    Decode { package: String, message: String },
    #[error("package '{0}' is not known to the index")]
    NotFound(String),
    #[error("no releases listed for '{0}'")]
    NoReleases(String),
    #[error("failed to read index file: {0}")]
    Io(#[from] std::io::Error),
}

pub trait PackageIndex: Send + Sync {
    fn release_versions(&self, package: &str) -> Result<Vec<String>, IndexError>;
}

pub fn sorted_versions(
    index: &dyn PackageIndex,
    package: &str,
) -> Result<Vec<String>, IndexError> {
    let mut versions = index.release_versions(package)?;
    if versions.is_empty() {
        return Err(IndexError::NoReleases(package.to_string()));
    }
    sort_versions(&mut versions);
    Ok(versions)
}

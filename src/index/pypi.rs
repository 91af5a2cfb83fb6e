use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::index::{IndexError, PackageIndex};

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

#[derive(Debug, Clone)]
pub struct PypiClient {
    pub base_url: String,
    client: Client,
}

impl PypiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, IndexError> {
        let base_url = normalize_base_url(&base_url.into());
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|err| IndexError::Transport {
                url: base_url.clone(),
                message: format!("failed to build http client: {err}"),
            })?;
        Ok(Self { base_url, client })
    }

    fn package_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package.trim())
    }
}

impl PackageIndex for PypiClient {
    fn release_versions(&self, package: &str) -> Result<Vec<String>, IndexError> {
        let url = self.package_url(package);
        debug!(%url, "querying package index");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|err| IndexError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;

        let body = parse_json_response(response, package)?;
        release_ids(&body, package)
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "pypi.org" {
        return DEFAULT_INDEX_URL.to_string();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    format!("https://{trimmed}")
}

fn parse_json_response(response: Response, package: &str) -> Result<Value, IndexError> {
    let status = response.status();
    let url = response.url().to_string();
    if status == StatusCode::NOT_FOUND {
        return Err(IndexError::NotFound(package.to_string()));
    }
    if !status.is_success() {
        return Err(IndexError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(|err| IndexError::Transport {
        url: url.clone(),
        message: err.to_string(),
    })?;
    serde_json::from_str(&body).map_err(|err| IndexError::Decode {
        package: package.to_string(),
        message: err.to_string(),
    })
}

fn release_ids(body: &Value, package: &str) -> Result<Vec<String>, IndexError> {
    let releases = body
        .get("releases")
        .and_then(Value::as_object)
        .ok_or_else(|| IndexError::Decode {
            package: package.to_string(),
            message: "missing 'releases' object".to_string(),
        })?;
    Ok(releases.keys().cloned().collect())
}

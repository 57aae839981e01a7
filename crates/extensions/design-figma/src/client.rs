//! Design file client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use autoprobe_protocols::{DesignError, DesignFile, DesignSource};

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Client settings.
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    pub access_token: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl FigmaConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base: "https://api.figma.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Error body returned by the files endpoint.
#[derive(Debug, Deserialize)]
struct FigmaErrorBody {
    err: String,
}

/// Design source backed by `GET /v1/files/<key>`.
pub struct FigmaClient {
    config: FigmaConfig,
    client: reqwest::Client,
}

impl FigmaClient {
    pub fn new(config: FigmaConfig) -> Result<Self, DesignError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DesignError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn file_url(&self, file_key: &str) -> String {
        format!(
            "{}/v1/files/{}",
            self.config.api_base.trim_end_matches('/'),
            file_key
        )
    }

    fn cache_path(cache_dir: &Path, file_key: &str) -> PathBuf {
        cache_dir.join(format!("{}.json", file_key))
    }

    /// Fetch the raw file body from the API.
    async fn download(&self, file_key: &str) -> Result<String, DesignError> {
        let url = self.file_url(file_key);
        debug!("Fetching design file {}", url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.config.access_token)
            .send()
            .await
            .map_err(|e| DesignError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DesignError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<FigmaErrorBody>(&body)
                .map(|b| b.err)
                .unwrap_or(body);
            return Err(DesignError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    async fn read_cached(path: &Path) -> Option<DesignFile> {
        let raw = tokio::fs::read_to_string(path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("Ignoring unreadable design cache {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl DesignSource for FigmaClient {
    async fn fetch_file(
        &self,
        file_key: &str,
        cache_dir: Option<&Path>,
    ) -> Result<DesignFile, DesignError> {
        let cache_path = cache_dir.map(|dir| Self::cache_path(dir, file_key));

        if let Some(path) = &cache_path {
            if let Some(file) = Self::read_cached(path).await {
                info!("Loaded design file {} from {}", file_key, path.display());
                return Ok(file);
            }
        }

        let body = self.download(file_key).await?;
        let file: DesignFile =
            serde_json::from_str(&body).map_err(|e| DesignError::InvalidFile(e.to_string()))?;

        if let Some(path) = &cache_path {
            tokio::fs::write(path, &body).await?;
            debug!("Cached design file at {}", path.display());
        }

        info!("Fetched design file {} ({})", file_key, file.name);
        Ok(file)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

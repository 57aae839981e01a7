//! Vision model client over the chat completions API.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tracing::{debug, trace};

use autoprobe_protocols::{ModelError, VisionModel};

use crate::api::{ApiErrorBody, ApiMessage, ApiRequest, ApiResponse};
use crate::images::user_message;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Which flavour of the chat completions API to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    /// Deployment-scoped URL, `api-key` header, `api-version` query.
    Azure,
    /// DashScope compatible mode.
    Qwen,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "azure" => Some(Self::Azure),
            "qwen" => Some(Self::Qwen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Azure => "azure",
            Self::Qwen => "qwen",
        }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub api_key: String,
    /// Model name, or deployment name for Azure.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub api_version: Option<String>,
}

impl VisionModelConfig {
    pub fn new(
        provider: ProviderKind,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            max_tokens: 500,
            timeout: Duration::from_secs(120),
            api_version: None,
        }
    }
}

/// Vision model backed by an OpenAI-compatible endpoint.
pub struct OpenAIVisionModel {
    id: String,
    endpoint: String,
    config: VisionModelConfig,
    client: reqwest::Client,
}

impl OpenAIVisionModel {
    pub fn new(config: VisionModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            id: format!("{}:{}", config.provider.as_str(), config.model),
            endpoint: endpoint(&config),
            config,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, message: ApiMessage) -> ApiRequest {
        ApiRequest {
            model: match self.config.provider {
                ProviderKind::Azure => None,
                _ => Some(self.config.model.clone()),
            },
            messages: vec![message],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, ModelError> {
        let request = self.client.post(&self.endpoint).json(api_request);
        let request = match self.config.provider {
            ProviderKind::Azure => request.header("api-key", &self.config.api_key),
            _ => request.bearer_auth(&self.config.api_key),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(self.config.timeout.as_secs())
            } else {
                ModelError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = response.text().await.unwrap_or_default();
        Err(status_error(status, retry_after, &text))
    }
}

fn endpoint(config: &VisionModelConfig) -> String {
    let base = config.base_url.trim_end_matches('/');
    match config.provider {
        ProviderKind::Azure => format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base,
            config.model,
            config.api_version.as_deref().unwrap_or_default()
        ),
        ProviderKind::OpenAI | ProviderKind::Qwen => format!("{}/chat/completions", base),
    }
}

fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> ModelError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ModelError::AuthenticationFailed(message)
        }
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited {
            retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        _ => ModelError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl VisionModel for OpenAIVisionModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_response(&self, prompt: &str, images: &[PathBuf]) -> Result<String, ModelError> {
        let message = user_message(prompt, images).await?;
        let api_request = self.build_request(message);
        debug!(
            "Requesting {} with {} image(s)",
            self.id,
            images.len()
        );

        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &api_response.usage {
            debug!(
                "Token usage: {} prompt, {} completion",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ModelError::InvalidResponse("response has no content".into()))?;
        trace!("Model response: {}", content);
        Ok(content)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub figma: FigmaConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub exploration: ExplorationConfig,
}

/// Control-surface server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Model providers understood by the vision client.
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "azure", "qwen"];

/// Vision model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// One of [`KNOWN_PROVIDERS`].
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    /// Model name, or deployment name for Azure.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Azure only.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
            api_version: default_api_version(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout() -> u64 {
    120
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

/// Design-file service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default = "default_figma_api_base")]
    pub api_base: String,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base: default_figma_api_base(),
        }
    }
}

fn default_figma_api_base() -> String {
    "https://api.figma.com".to_string()
}

/// Browser driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome DevTools endpoint (`http://host:port`).
    #[serde(default = "default_cdp_endpoint")]
    pub cdp_endpoint: String,

    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    /// Intermediate mouse moves per swipe.
    #[serde(default = "default_swipe_steps")]
    pub swipe_steps: u32,

    /// How long to wait for the prototype canvas after navigation.
    #[serde(default = "default_load_timeout")]
    pub load_timeout_seconds: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            cdp_endpoint: default_cdp_endpoint(),
            long_press_ms: default_long_press_ms(),
            swipe_steps: default_swipe_steps(),
            load_timeout_seconds: default_load_timeout(),
        }
    }
}

fn default_cdp_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_long_press_ms() -> u64 {
    1000
}

fn default_swipe_steps() -> u32 {
    10
}

fn default_load_timeout() -> u64 {
    30
}

/// Exploration loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Fixed pause after each model exchange.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Draw labels for dark backgrounds.
    #[serde(default)]
    pub dark_mode: bool,

    /// Root under which `apps/<app>/...` and design caches live.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            request_interval_ms: default_request_interval_ms(),
            dark_mode: false,
            root_dir: default_root_dir(),
        }
    }
}

fn default_max_rounds() -> u32 {
    20
}

fn default_request_interval_ms() -> u64 {
    3000
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

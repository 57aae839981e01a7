//! Wiring from configuration to concrete collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use autoprobe_annotate::ImageAnnotator;
use autoprobe_config::{Config, ConfigLoader, ConfigValidator, ExplorationConfig};
use autoprobe_design_figma::{FigmaClient, FigmaConfig};
use autoprobe_driver_cdp::{CdpDriverConfig, CdpDriverFactory};
use autoprobe_provider_openai::{OpenAIVisionModel, ProviderKind, VisionModelConfig};
use autoprobe_runtime::{ControllerServices, LabeledResponseParser, SessionConfig};

/// Get the .autoprobe directory path.
pub(crate) fn autoprobe_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".autoprobe"))
        .unwrap_or_else(|| PathBuf::from(".autoprobe"))
}

/// Load and validate the configuration file.
///
/// A missing file falls back to built-in defaults.
pub(crate) fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        info!("Loading configuration from {}", path.display());
        ConfigLoader::load(path)?
    } else {
        warn!("Config file {} not found, using defaults", path.display());
        Config::default()
    };

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

pub(crate) fn session_config(config: &ExplorationConfig) -> SessionConfig {
    SessionConfig {
        max_rounds: config.max_rounds,
        request_interval: Duration::from_millis(config.request_interval_ms),
        dark_mode: config.dark_mode,
    }
}

/// Root directory with `~` expanded.
pub(crate) fn root_dir(config: &ExplorationConfig) -> PathBuf {
    PathBuf::from(ConfigLoader::expand_path(&config.root_dir.to_string_lossy()))
}

/// Build the model, design, browser and annotation collaborators.
pub(crate) fn build_services(
    config: &Config,
) -> Result<ControllerServices, Box<dyn std::error::Error>> {
    let provider = ProviderKind::parse(&config.model.provider)
        .ok_or_else(|| format!("Unknown model provider: {}", config.model.provider))?;
    let mut model_config = VisionModelConfig::new(
        provider,
        &config.model.base_url,
        &config.model.api_key,
        &config.model.model,
    );
    model_config.temperature = config.model.temperature;
    model_config.max_tokens = config.model.max_tokens;
    model_config.timeout = Duration::from_secs(config.model.timeout_seconds);
    if !config.model.api_version.is_empty() {
        model_config.api_version = Some(config.model.api_version.clone());
    }
    let model = OpenAIVisionModel::new(model_config)?;
    info!("Using vision model {}", autoprobe_protocols::VisionModel::id(&model));

    let design_source = FigmaClient::new(
        FigmaConfig::new(&config.figma.access_token).with_api_base(&config.figma.api_base),
    )?;

    let driver_factory = CdpDriverFactory::new(CdpDriverConfig {
        endpoint: config.browser.cdp_endpoint.clone(),
        long_press_ms: config.browser.long_press_ms,
        swipe_steps: config.browser.swipe_steps,
        load_timeout: Duration::from_secs(config.browser.load_timeout_seconds),
    });

    Ok(ControllerServices {
        model: Arc::new(model),
        parser: Arc::new(LabeledResponseParser),
        design_source: Arc::new(design_source),
        driver_factory: Arc::new(driver_factory),
        annotator: Arc::new(ImageAnnotator::new()?),
    })
}

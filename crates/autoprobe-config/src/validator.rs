//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, KNOWN_PROVIDERS};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_model(config, &mut result);
        Self::validate_figma(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_exploration(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_model(config: &Config, result: &mut ValidationResult) {
        let model = &config.model;

        if !KNOWN_PROVIDERS.contains(&model.provider.as_str()) {
            result.add_error(ValidationError::new(
                "model.provider",
                format!(
                    "Unknown provider '{}', valid values: {:?}",
                    model.provider, KNOWN_PROVIDERS
                ),
            ));
        }

        if model.api_key.trim().is_empty() {
            result.add_error(ValidationError::new(
                "model.api_key",
                "API key is not set",
            ));
        }

        Self::check_http_url("model.base_url", &model.base_url, result);

        if model.model.is_empty() {
            result.add_error(ValidationError::new("model.model", "Model name cannot be empty"));
        }

        if model.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "model.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if model.provider == "azure" && model.api_version.is_empty() {
            result.add_error(ValidationError::new(
                "model.api_version",
                "api_version is required for the azure provider",
            ));
        }
    }

    fn validate_figma(config: &Config, result: &mut ValidationResult) {
        Self::check_http_url("figma.api_base", &config.figma.api_base, result);

        if config.figma.access_token.is_empty() {
            result.add_warning(ValidationWarning::new(
                "figma.access_token",
                "Access token is not set, only cached design files can be used",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        Self::check_http_url("browser.cdp_endpoint", &config.browser.cdp_endpoint, result);

        if config.browser.swipe_steps == 0 {
            result.add_error(ValidationError::new(
                "browser.swipe_steps",
                "swipe_steps must be greater than 0",
            ));
        }
    }

    fn validate_exploration(config: &Config, result: &mut ValidationResult) {
        if config.exploration.max_rounds == 0 {
            result.add_error(ValidationError::new(
                "exploration.max_rounds",
                "max_rounds must be greater than 0",
            ));
        }

        if config.exploration.max_rounds > 200 {
            result.add_warning(ValidationWarning::new(
                "exploration.max_rounds",
                "max_rounds is very high (>200), each round costs two model calls",
            ));
        }
    }

    fn check_http_url(path: &str, value: &str, result: &mut ValidationResult) {
        match url::Url::parse(value) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                path,
                "URL must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(path, format!("Invalid URL: {}", e))),
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

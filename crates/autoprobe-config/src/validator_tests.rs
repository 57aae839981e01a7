use super::*;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.model.api_key = "sk-test".to_string();
    config.figma.access_token = "figd_test".to_string();
    config
}

#[test]
fn test_validate_valid_config() {
    let result = ConfigValidator::validate(&valid_config()).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_default_config_missing_key() {
    let result = ConfigValidator::validate(&Config::default()).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "model.api_key"));
    assert!(result.warnings.iter().any(|w| w.path == "figma.access_token"));
}

#[test]
fn test_validate_invalid_port() {
    let mut config = valid_config();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "server.port"));
}

#[test]
fn test_validate_zero_max_rounds() {
    let mut config = valid_config();
    config.exploration.max_rounds = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "exploration.max_rounds"));
}

#[test]
fn test_validate_high_max_rounds_warning() {
    let mut config = valid_config();
    config.exploration.max_rounds = 500;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "exploration.max_rounds"));
}

#[test]
fn test_validate_unknown_provider() {
    let mut config = valid_config();
    config.model.provider = "mystery".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "model.provider"));
}

#[test]
fn test_validate_invalid_base_url() {
    let mut config = valid_config();
    config.model.base_url = "not a url".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "model.base_url"));
}

#[test]
fn test_validate_non_http_endpoint() {
    let mut config = valid_config();
    config.browser.cdp_endpoint = "ftp://localhost:9222".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "browser.cdp_endpoint"));
}

#[test]
fn test_into_result() {
    let mut config = valid_config();
    config.server.port = 0;
    let err = ConfigValidator::validate(&config)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert!(err.to_string().contains("server.port"));

    let warnings = ConfigValidator::validate(&valid_config())
        .unwrap()
        .into_result()
        .unwrap();
    assert!(warnings.is_empty());
}

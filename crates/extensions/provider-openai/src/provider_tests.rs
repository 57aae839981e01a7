use super::*;
use tempfile::TempDir;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn screenshot(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("1_before_labeled.png");
    std::fs::write(&path, b"png").unwrap();
    path
}

fn model(provider: ProviderKind, base_url: &str) -> OpenAIVisionModel {
    let mut config = VisionModelConfig::new(provider, base_url, "test-key", "gpt-4o");
    config.api_version = Some("2024-02-15-preview".into());
    OpenAIVisionModel::new(config).unwrap()
}

#[test]
fn test_provider_kind_parse() {
    assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAI));
    assert_eq!(ProviderKind::parse("azure"), Some(ProviderKind::Azure));
    assert_eq!(ProviderKind::parse("qwen"), Some(ProviderKind::Qwen));
    assert_eq!(ProviderKind::parse("gemini"), None);
}

#[test]
fn test_endpoints() {
    assert_eq!(
        model(ProviderKind::OpenAI, "https://api.openai.com/v1/").endpoint(),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(
        model(ProviderKind::Azure, "https://res.openai.azure.com").endpoint(),
        "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview"
    );
    assert_eq!(
        model(
            ProviderKind::Qwen,
            "https://dashscope.aliyuncs.com/compatible-mode/v1"
        )
        .endpoint(),
        "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
    );
}

#[test]
fn test_model_id() {
    assert_eq!(model(ProviderKind::Qwen, "http://x").id(), "qwen:gpt-4o");
}

#[tokio::test]
async fn test_get_response_success() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/chat/completions"))
        .and(matchers::header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Action: tap(1)")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let model = model(ProviderKind::OpenAI, &mock_server.uri());
    let response = model
        .get_response("Which element?", &[screenshot(&dir)])
        .await
        .unwrap();

    assert_eq!(response, "Action: tap(1)");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["messages"][0]["content"][0]["text"], "Which element?");
    assert_eq!(
        body["messages"][0]["content"][1]["image_url"]["url"],
        "data:image/png;base64,cG5n"
    );
}

#[tokio::test]
async fn test_azure_uses_api_key_header() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/openai/deployments/gpt-4o/chat/completions"))
        .and(matchers::query_param("api-version", "2024-02-15-preview"))
        .and(matchers::header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("FINISH")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = model(ProviderKind::Azure, &mock_server.uri());
    let response = model.get_response("done?", &[]).await.unwrap();
    assert_eq!(response, "FINISH");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn test_authentication_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let result = model(ProviderKind::OpenAI, &mock_server.uri())
        .get_response("hi", &[])
        .await;

    match result {
        Err(ModelError::AuthenticationFailed(message)) => {
            assert_eq!(message, "Incorrect API key provided")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let result = model(ProviderKind::OpenAI, &mock_server.uri())
        .get_response("hi", &[])
        .await;

    assert!(matches!(
        result,
        Err(ModelError::RateLimited { retry_after_seconds: 7 })
    ));
}

#[tokio::test]
async fn test_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let result = model(ProviderKind::OpenAI, &mock_server.uri())
        .get_response("hi", &[])
        .await;

    match result {
        Err(ModelError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let result = model(ProviderKind::OpenAI, &mock_server.uri())
        .get_response("hi", &[])
        .await;

    assert!(matches!(result, Err(ModelError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreadable_image_is_not_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = model(ProviderKind::OpenAI, &mock_server.uri())
        .get_response("hi", &[PathBuf::from("/nonexistent.png")])
        .await;

    assert!(matches!(result, Err(ModelError::ImageUnreadable { .. })));
}

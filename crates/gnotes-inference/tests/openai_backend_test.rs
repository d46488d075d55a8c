//! OpenAI backend wire behaviour against a mock HTTP server.

use gnotes_core::{
    ChatMessage, CompletionBackend, EmbeddingBackend, Error, FailureKind, GenerationParams,
};
use gnotes_inference::openai::{OpenAIBackend, OpenAIConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> OpenAIBackend {
    OpenAIBackend::new(OpenAIConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        embed_dimension: 3,
        timeout_seconds: 5,
        ..Default::default()
    })
    .expect("Failed to create backend")
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant that summarizes notes."),
        ChatMessage::user("Summarize this note:\nhello"),
    ]
}

#[tokio::test]
async fn test_completion_sends_model_params_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 100
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "  A summary.\n"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = GenerationParams {
        temperature: 0.7,
        max_tokens: 100,
    };
    let text = backend(&server).complete(&messages(), params).await.unwrap();
    assert_eq!(text, "A summary.");
}

#[tokio::test]
async fn test_completion_missing_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})))
        .mount(&server)
        .await;

    let err = backend(&server)
        .complete(&messages(), GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
}

#[tokio::test]
async fn test_completion_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .complete(&messages(), GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_rate_limit_body_preserved() {
    let server = MockServer::start().await;
    let body = r#"{"error":{"message":"Rate limit reached for gpt-3.5-turbo","type":"requests"}}"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string(body))
        .mount(&server)
        .await;

    let err = backend(&server)
        .complete(&messages(), GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::RateLimited);
    assert!(err.to_string().contains(body));
}

#[tokio::test]
async fn test_unauthorized_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .embed_texts(&["x".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unauthorized);
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_server_error_prefixed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .complete(&messages(), GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Inference error: AI API error: internal");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_embeddings_sorted_by_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({"model": "text-embedding-ada-002"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"embedding": [0.0, 1.0, 0.0], "index": 1},
                {"embedding": [1.0, 0.0, 0.0], "index": 0}
            ],
            "model": "text-embedding-ada-002",
            "usage": {"prompt_tokens": 2, "total_tokens": 2}
        })))
        .mount(&server)
        .await;

    let vectors = backend(&server)
        .embed_texts(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();
    assert_eq!(vectors[0].as_slice(), &[1.0, 0.0, 0.0]);
    assert_eq!(vectors[1].as_slice(), &[0.0, 1.0, 0.0]);
}

#[tokio::test]
async fn test_embedding_count_mismatch_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = backend(&server).embed_one("x").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
}

#[tokio::test]
async fn test_embedding_dimension_mismatch_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3, 0.4, 0.5], "index": 0}],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 1, "total_tokens": 1}
        })))
        .mount(&server)
        .await;

    let err = backend(&server).embed_one("x").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
    assert!(err.to_string().contains("expected 3-dimensional embeddings, got 5"));
}

#[tokio::test]
async fn test_connection_failure_is_network() {
    let config = OpenAIConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: "k".to_string(),
        timeout_seconds: 2,
        ..Default::default()
    };
    let err = OpenAIBackend::new(config)
        .unwrap()
        .complete(&messages(), GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn test_empty_batch_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let vectors = backend(&server).embed_texts(&[]).await.unwrap();
    assert!(vectors.is_empty());
}

//! Integration tests for the Gemini provider against a mock HTTP server

use mockito::{Matcher, Server};
use pii_gateway::adapters::generation::{GeminiProvider, GenerationProvider};
use pii_gateway::anonymization::{AnonymizationEngine, DetectionConfig};
use pii_gateway::config::{secret_string, GenerationConfig, RetryConfig};
use pii_gateway::core::PiiGateway;
use pii_gateway::domain::{GatewayError, GenerationError};
use serde_json::json;
use std::sync::Arc;

const PATH: &str = "/models/gemini-test:generateContent";

fn config(base_url: String, max_retries: usize) -> GenerationConfig {
    GenerationConfig {
        provider: "gemini".to_string(),
        api_key: Some(secret_string("test-key".to_string())),
        model: "gemini-test".to_string(),
        base_url,
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        },
        ..GenerationConfig::default()
    }
}

fn reply_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_sends_key_header_and_instruction() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_query(Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Hi <PII:EMAIL:0badc0de>" }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_body("Hello <PII:EMAIL:0badc0de>"))
        .expect(1)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url(), 0)).unwrap();
    let reply = provider.generate("Hi <PII:EMAIL:0badc0de>").await.unwrap();

    assert_eq!(reply, "Hello <PII:EMAIL:0badc0de>");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_system_instruction_mentions_tokens() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(
            r#""systemInstruction":\{"parts":\[\{"text":"[^"]*<PII:TYPE:ID>"#.to_string(),
        ))
        .with_status(200)
        .with_body(reply_body("ok"))
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url(), 0)).unwrap();
    assert_eq!(provider.generate("x").await.unwrap(), "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_retried_up_to_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("unavailable")
        .expect(3)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url(), 2)).unwrap();
    let err = provider.generate("x").await.unwrap_err();

    assert!(matches!(err, GenerationError::ServerError { status: 503, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_errors_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(403)
        .with_body(r#"{"error":{"message":"API key not valid"}}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url(), 3)).unwrap();
    let err = provider.generate("x").await.unwrap_err();

    assert!(matches!(err, GenerationError::ClientError { status: 403, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blocked_prompt_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url(), 0)).unwrap();
    match provider.generate("x").await {
        Err(GenerationError::InvalidResponse(reason)) => assert_eq!(reason, "SAFETY"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_round_trip_through_gemini() {
    let mut server = Server::new_async().await;
    // Reply echoes whatever token the gateway issued
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(r"<PII:EMAIL:[0-9a-f]{8}>".to_string()))
        .with_status(200)
        .with_body_from_request(|request| {
            let body: serde_json::Value =
                serde_json::from_slice(request.body().unwrap()).unwrap();
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
            reply_body(&format!("Sure, I will write to {prompt}")).into_bytes()
        })
        .expect(1)
        .create_async()
        .await;

    let engine = AnonymizationEngine::from_config(&DetectionConfig::default()).unwrap();
    let provider = GeminiProvider::new(&config(server.url(), 0)).unwrap();
    let gateway = PiiGateway::new(Arc::new(engine), Arc::new(provider));

    let reply = gateway.chat("jan@example.com").await.unwrap();
    assert_eq!(reply.text, "Sure, I will write to jan@example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gateway_hides_provider_detail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("stack trace with internals")
        .create_async()
        .await;

    let engine = AnonymizationEngine::from_config(&DetectionConfig::default()).unwrap();
    let provider = GeminiProvider::new(&config(server.url(), 0)).unwrap();
    let gateway = PiiGateway::new(Arc::new(engine), Arc::new(provider));

    let err = gateway.chat("hello").await.unwrap_err();
    assert!(matches!(err, GatewayError::ExternalService(_)));
    assert!(!err.public_message().contains("internals"));
    assert!(err.to_string().contains("internals"));
}

//! Mock HTTP server tests for `ClassificationClient::classify()`.
//!
//! Uses [`wiremock`] to stand up a local server that emulates the
//! OpenAI-compatible chat completion endpoint, exercising the full request
//! path without a real backend.
//!
//! Coverage:
//! - Successful completion returns the raw content
//! - Prose-wrapped answers pass through untouched (no parsing here)
//! - Request body carries model, response cap, and temperature
//! - 500 / connection-level failures map to `Unavailable`
//! - Missing or empty content maps to `EmptyResponse`
//! - A slow backend plus a short client timeout maps to `Timeout`

use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use triage_llm::{ClassificationClient, ClassifyError};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test-001",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn client(server_url: &str) -> ClassificationClient {
    ClassificationClient::new(server_url, "sk-test-key", "test-model")
}

#[tokio::test]
async fn classify_returns_raw_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"category": "Bug Report", "urgency_score": 4}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server.uri())
        .classify("the login page crashes")
        .await
        .expect("classification should succeed");

    assert_eq!(content, r#"{"category": "Bug Report", "urgency_score": 4}"#);
}

#[tokio::test]
async fn classify_passes_prose_wrapped_answers_through() {
    let server = MockServer::start().await;

    let wrapped =
        r#"Here is the analysis: {"category": "Bug Report", "urgency_score": 4} Hope this helps!"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(wrapped)))
        .mount(&server)
        .await;

    let content = client(&server.uri())
        .classify("the login page crashes")
        .await
        .expect("classification should succeed");

    // The client hands back raw text; extraction is the validator's job.
    assert_eq!(content, wrapped);
}

#[tokio::test]
async fn request_carries_model_cap_and_temperature() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "max_completion_tokens": 100,
            "temperature": 0.3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"category": "General Inquiry", "urgency_score": 1}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    client(&server.uri())
        .classify("where is the settings page")
        .await
        .expect("classification should succeed");
}

#[tokio::test]
async fn prompt_embeds_the_feedback_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(wiremock::matchers::body_string_contains(
            "Feedback to analyze: \\\"the export button does nothing\\\"",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"category": "Bug Report", "urgency_score": 3}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    client(&server.uri())
        .classify("the export button does nothing")
        .await
        .expect("classification should succeed");
}

#[tokio::test]
async fn backend_error_status_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .classify("anything")
        .await
        .expect_err("should fail");

    match err {
        ClassifyError::Unavailable(detail) => assert!(detail.contains("500")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_unavailable() {
    // Nothing is listening on this port.
    let err = ClassificationClient::new("http://127.0.0.1:1", "sk-test-key", "test-model")
        .classify("anything")
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClassifyError::Unavailable(_)));
}

#[tokio::test]
async fn empty_content_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("")))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .classify("anything")
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClassifyError::EmptyResponse));
}

#[tokio::test]
async fn missing_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-test-002",
            "object": "chat.completion",
            "model": "test-model",
            "choices": []
        })))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .classify("anything")
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClassifyError::EmptyResponse));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(
                    r#"{"category": "Bug Report", "urgency_score": 4}"#,
                ))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .with_timeout(Duration::from_millis(50))
        .classify("anything")
        .await
        .expect_err("should time out");

    assert!(matches!(err, ClassifyError::Timeout(50)));
}

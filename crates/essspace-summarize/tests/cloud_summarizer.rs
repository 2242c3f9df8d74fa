//! HTTP-level tests for the cloud summarizer against a mock inference API.

use std::sync::Arc;
use std::time::Duration;

use essspace_summarize::{
    CloudSummarizer, CloudSummarizerConfig, StaticConnectivity, SummarizationService,
    SummarizeError, SummarizerPreference, TextSummarizer,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "facebook/bart-large-cnn";

fn long_text() -> String {
    "The quarterly meeting covered budget, hiring and the roadmap for the next release. ".repeat(3)
}

fn summarizer_for(server: &MockServer) -> CloudSummarizer {
    let config = CloudSummarizerConfig::new()
        .with_base_url(format!("{}/models", server.uri()))
        .with_model(MODEL)
        .with_timeout(Duration::from_secs(5));
    CloudSummarizer::new(config).expect("client")
}

#[tokio::test]
async fn test_sends_inputs_with_bearer_token() {
    let server = MockServer::start().await;
    let text = long_text();

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}")))
        .and(header("Authorization", "Bearer hf_test"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "inputs": text })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "summary_text": "Budget and hiring." }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let summary = summarizer_for(&server)
        .summarize(&text, Some("hf_test"))
        .await
        .unwrap();
    assert_eq!(summary, "Budget and hiring.");
}

#[tokio::test]
async fn test_http_error_status_is_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .summarize(&long_text(), Some("hf_test"))
        .await
        .unwrap_err();
    assert!(matches!(err, SummarizeError::Backend(ref m) if m.contains("503")));
}

#[tokio::test]
async fn test_error_entry_in_body_is_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "error": "quota" }])),
        )
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .summarize(&long_text(), Some("hf_test"))
        .await
        .unwrap_err();
    assert!(matches!(err, SummarizeError::Backend(ref m) if m.contains("quota")));
}

#[tokio::test]
async fn test_empty_body_is_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .summarize(&long_text(), Some("hf_test"))
        .await
        .unwrap_err();
    assert!(matches!(err, SummarizeError::Backend(_)));
}

#[tokio::test]
async fn test_short_text_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .summarize("brief", Some("hf_test"))
        .await
        .unwrap_err();
    assert!(matches!(err, SummarizeError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_auto_preference_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let service = SummarizationService::with_cloud(
        Arc::new(summarizer_for(&server)),
        Arc::new(StaticConnectivity::online()),
    );
    let text = long_text();

    let summary = service
        .get_summary(&text, SummarizerPreference::Auto, Some("hf_test"))
        .await
        .unwrap();

    let expected: String = text.chars().take(100).collect();
    assert_eq!(summary, format!("{expected}..."));
}

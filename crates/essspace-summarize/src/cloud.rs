//! Cloud summarizer backed by a hosted inference API.
//!
//! The endpoint is `<base_url>/<model>`. Requests carry `{"inputs": text}` and
//! a bearer token; the API answers with `[{"summary_text": ...}]` or, when it
//! cannot serve the request, `[{"error": ...}]` / `{"error": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, SummarizeError};
use crate::summarizer::TextSummarizer;

/// Inputs shorter than this are rejected instead of sent.
pub const MIN_CLOUD_INPUT_CHARS: usize = 100;

/// Configuration for [`CloudSummarizer`].
#[derive(Debug, Clone)]
pub struct CloudSummarizerConfig {
    /// Base URL of the inference API.
    pub base_url: String,
    /// Model path appended to the base URL.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CloudSummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            model: "facebook/bart-large-cnn".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CloudSummarizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

/// Summarizer that calls the hosted inference API.
#[derive(Debug, Clone)]
pub struct CloudSummarizer {
    client: Client,
    config: CloudSummarizerConfig,
}

impl CloudSummarizer {
    pub fn new(config: CloudSummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| SummarizeError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CloudSummarizerConfig {
        &self.config
    }
}

#[async_trait]
impl TextSummarizer for CloudSummarizer {
    async fn summarize(&self, text: &str, api_key: Option<&str>) -> Result<String> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                SummarizeError::Config("API key is required for cloud summarizer".to_string())
            })?;

        if text.chars().count() < MIN_CLOUD_INPUT_CHARS {
            return Err(SummarizeError::InvalidRequest(
                "Text is too short to summarize effectively".to_string(),
            ));
        }

        debug!(
            model = %self.config.model,
            chars = text.chars().count(),
            "Requesting cloud summary"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, body = %body, "Summarization request failed");
            return Err(SummarizeError::Backend(format!("API error: HTTP {}", status)));
        }

        let summary = parse_summary_response(&body)?;
        info!(chars = summary.chars().count(), "Cloud summary received");
        Ok(summary)
    }

    fn name(&self) -> &str {
        "cloud"
    }
}

/// Extract the summary from a response body.
fn parse_summary_response(body: &str) -> Result<String> {
    if body.trim().is_empty() {
        return Err(SummarizeError::Backend(
            "Empty response body from API".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(body)?;

    let first = match &value {
        Value::Array(items) => items.first().ok_or_else(|| {
            SummarizeError::Backend("Empty array in API response".to_string())
        })?,
        // Model-loading and quota errors come back as a bare object.
        Value::Object(_) => &value,
        _ => {
            return Err(SummarizeError::Serialization(
                "Unexpected JSON structure from API".to_string(),
            ));
        }
    };

    if let Some(summary) = first.get("summary_text").and_then(Value::as_str) {
        return Ok(summary.to_string());
    }
    if let Some(error) = first.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(SummarizeError::Backend(format!(
            "API returned an error: {}",
            message
        )));
    }

    Err(SummarizeError::Serialization(
        "Unexpected JSON structure from API".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let config = CloudSummarizerConfig::new()
            .with_base_url("http://localhost:8080/models/")
            .with_model("org/model");
        assert_eq!(config.endpoint(), "http://localhost:8080/models/org/model");
        assert_eq!(
            CloudSummarizerConfig::default().endpoint(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
        );
    }

    #[test]
    fn test_parse_summary_text() {
        let summary = parse_summary_response(r#"[{"summary_text": "Short."}]"#).unwrap();
        assert_eq!(summary, "Short.");
    }

    #[test]
    fn test_parse_error_entry() {
        let err = parse_summary_response(r#"[{"error": "overloaded"}]"#).unwrap_err();
        assert!(matches!(err, SummarizeError::Backend(ref m) if m.contains("overloaded")));

        let err = parse_summary_response(r#"{"error": "Model is loading"}"#).unwrap_err();
        assert!(matches!(err, SummarizeError::Backend(ref m) if m.contains("loading")));
    }

    #[test]
    fn test_parse_empty_and_unexpected_shapes() {
        assert!(matches!(
            parse_summary_response("  ").unwrap_err(),
            SummarizeError::Backend(_)
        ));
        assert!(matches!(
            parse_summary_response("[]").unwrap_err(),
            SummarizeError::Backend(_)
        ));
        assert!(matches!(
            parse_summary_response(r#"[{"label": "x"}]"#).unwrap_err(),
            SummarizeError::Serialization(_)
        ));
        assert!(matches!(
            parse_summary_response("42").unwrap_err(),
            SummarizeError::Serialization(_)
        ));
        assert!(matches!(
            parse_summary_response("not json").unwrap_err(),
            SummarizeError::Serialization(_)
        ));
    }

    #[tokio::test]
    async fn test_requires_api_key() {
        let summarizer = CloudSummarizer::new(CloudSummarizerConfig::default()).unwrap();
        let text = "x".repeat(200);

        let err = summarizer.summarize(&text, None).await.unwrap_err();
        assert!(matches!(err, SummarizeError::Config(_)));

        let err = summarizer.summarize(&text, Some("  ")).await.unwrap_err();
        assert!(matches!(err, SummarizeError::Config(_)));
    }

    #[tokio::test]
    async fn test_rejects_short_text_without_request() {
        let summarizer = CloudSummarizer::new(CloudSummarizerConfig::default()).unwrap();
        let err = summarizer
            .summarize("too short", Some("hf_key"))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidRequest(_)));
    }
}

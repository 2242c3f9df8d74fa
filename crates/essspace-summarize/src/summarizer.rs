//! The summarizer trait and the local implementations.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, SummarizeError};

// ─────────────────────────────────────────────────────────────────────────────
// Summarizer Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Something that turns a long text into a shorter one.
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    /// Summarize `text`. Summarizers that don't call out to a service ignore `api_key`.
    async fn summarize(&self, text: &str, api_key: Option<&str>) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// A shared summarizer that can be used across threads.
pub type SharedSummarizer = Arc<dyn TextSummarizer>;

// ─────────────────────────────────────────────────────────────────────────────
// On-device Summarizer
// ─────────────────────────────────────────────────────────────────────────────

/// Characters kept by the on-device summarizer.
pub const ON_DEVICE_SUMMARY_CHARS: usize = 100;

/// Offline summarizer: keeps the first [`ON_DEVICE_SUMMARY_CHARS`] characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnDeviceSummarizer;

impl OnDeviceSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous form of [`TextSummarizer::summarize`].
    pub fn summarize_now(&self, text: &str) -> String {
        if text.chars().count() <= ON_DEVICE_SUMMARY_CHARS {
            return text.to_string();
        }
        let head: String = text.chars().take(ON_DEVICE_SUMMARY_CHARS).collect();
        format!("{head}...")
    }
}

#[async_trait]
impl TextSummarizer for OnDeviceSummarizer {
    async fn summarize(&self, text: &str, _api_key: Option<&str>) -> Result<String> {
        Ok(self.summarize_now(text))
    }

    fn name(&self) -> &str {
        "on_device"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Summarizer
// ─────────────────────────────────────────────────────────────────────────────

/// Scripted summarizer for tests.
///
/// Replies are returned in order; once exhausted, every call fails with a
/// backend error. Each input text is recorded.
#[derive(Debug, Default)]
pub struct MockSummarizer {
    name: String,
    replies: Mutex<Vec<Result<String>>>,
    requests: Mutex<Vec<String>>,
}

impl MockSummarizer {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            name: "mock".to_string(),
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A mock that answers once with `summary`.
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self::new(vec![Ok(summary.into())])
    }

    /// A mock that fails once with a backend error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(SummarizeError::Backend(message.into()))])
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Texts passed to `summarize`, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl TextSummarizer for MockSummarizer {
    async fn summarize(&self, text: &str, _api_key: Option<&str>) -> Result<String> {
        self.requests.lock().push(text.to_string());

        let mut replies = self.replies.lock();
        if replies.is_empty() {
            return Err(SummarizeError::Backend(
                "MockSummarizer: no more replies available".to_string(),
            ));
        }
        replies.remove(0)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

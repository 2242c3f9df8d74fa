//! Text summarization for Essspace.
//!
//! Two summarizers implement the [`TextSummarizer`] trait: a trivial
//! on-device one that truncates, and a cloud one backed by a hosted
//! inference API. [`SummarizationService`] picks between them based on the
//! user's [`SummarizerPreference`], connectivity and whether an API key is set.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  SummarizationService::get_summary()         │
//! │  preference + ConnectivityProbe + api key    │
//! └──────────────────────────────────────────────┘
//!                  │
//!        ┌─────────┴─────────┐
//!        ▼                   ▼
//! ┌──────────────┐   ┌────────────────┐
//! │  OnDevice    │   │  Cloud (HTTP)  │
//! └──────────────┘   └────────────────┘
//! ```

pub mod cloud;
pub mod connectivity;
pub mod error;
pub mod service;
pub mod summarizer;

pub use cloud::{CloudSummarizer, CloudSummarizerConfig, MIN_CLOUD_INPUT_CHARS};
pub use connectivity::{ConnectivityProbe, SharedConnectivity, StaticConnectivity, TcpProbe};
pub use error::{Result, SummarizeError};
pub use service::{SummarizationService, SummarizerPreference};
pub use summarizer::{
    MockSummarizer, ON_DEVICE_SUMMARY_CHARS, OnDeviceSummarizer, SharedSummarizer, TextSummarizer,
};

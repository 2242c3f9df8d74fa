//! Summarizer selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connectivity::SharedConnectivity;
use crate::error::{Result, SummarizeError};
use crate::summarizer::{OnDeviceSummarizer, SharedSummarizer};

/// Which summarizer the user prefers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerPreference {
    /// Cloud when online with a key, on-device otherwise.
    #[default]
    Auto,
    OnDevice,
    Cloud,
}

impl std::fmt::Display for SummarizerPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::OnDevice => write!(f, "on_device"),
            Self::Cloud => write!(f, "cloud"),
        }
    }
}

impl std::str::FromStr for SummarizerPreference {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(Self::Auto),
            "on_device" | "ondevice" | "local" => Ok(Self::OnDevice),
            "cloud" => Ok(Self::Cloud),
            other => Err(SummarizeError::Config(format!(
                "unknown summarizer preference '{other}' (expected auto, on_device or cloud)"
            ))),
        }
    }
}

/// Routes a summary request to the on-device or cloud summarizer.
#[derive(Clone)]
pub struct SummarizationService {
    on_device: SharedSummarizer,
    cloud: SharedSummarizer,
    connectivity: SharedConnectivity,
}

impl std::fmt::Debug for SummarizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationService")
            .field("on_device", &self.on_device.name())
            .field("cloud", &self.cloud.name())
            .finish_non_exhaustive()
    }
}

impl SummarizationService {
    pub fn new(
        on_device: SharedSummarizer,
        cloud: SharedSummarizer,
        connectivity: SharedConnectivity,
    ) -> Self {
        Self {
            on_device,
            cloud,
            connectivity,
        }
    }

    /// Service with the stock [`OnDeviceSummarizer`] and the given cloud summarizer.
    pub fn with_cloud(cloud: SharedSummarizer, connectivity: SharedConnectivity) -> Self {
        Self::new(Arc::new(OnDeviceSummarizer::new()), cloud, connectivity)
    }

    /// Summarize `text` according to `preference`.
    ///
    /// - `OnDevice` always uses the on-device summarizer.
    /// - `Cloud` fails when offline or without a key.
    /// - `Auto` tries the cloud when online with a key and falls back to
    ///   on-device if that fails; otherwise it goes straight to on-device.
    pub async fn get_summary(
        &self,
        text: &str,
        preference: SummarizerPreference,
        api_key: Option<&str>,
    ) -> Result<String> {
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());

        match preference {
            SummarizerPreference::OnDevice => self.on_device.summarize(text, None).await,
            SummarizerPreference::Cloud => {
                if !self.connectivity.is_online().await {
                    return Err(SummarizeError::Offline);
                }
                let Some(key) = api_key else {
                    return Err(SummarizeError::Config(
                        "API key for cloud summarizer is missing".to_string(),
                    ));
                };
                self.cloud.summarize(text, Some(key)).await
            }
            SummarizerPreference::Auto => {
                let key = match api_key {
                    Some(key) if self.connectivity.is_online().await => key,
                    _ => {
                        debug!("Using on-device summarizer (offline or no API key)");
                        return self.on_device.summarize(text, None).await;
                    }
                };

                match self.cloud.summarize(text, Some(key)).await {
                    Ok(summary) => Ok(summary),
                    Err(e) => {
                        warn!(error = %e, "Cloud summarization failed, falling back to on-device");
                        self.on_device.summarize(text, None).await
                    }
                }
            }
        }
    }
}

//! Screenshot pipeline: frame → cropped PNG → OCR → broadcast.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{CaptureError, Result};
use crate::frame::{RawFrame, crop_frame, save_png};
use crate::ocr::SharedRecognizer;

/// Buffered events per subscriber before slow receivers start lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Broadcast when a capture attempt finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A screenshot was written; `ocr_text` is `None` when OCR was skipped,
    /// failed, or found nothing but noise.
    ScreenshotProcessed {
        path: PathBuf,
        ocr_text: Option<String>,
    },
    /// The capture was aborted.
    Failed { reason: String },
}

impl CaptureEvent {
    /// Label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureEvent::ScreenshotProcessed { .. } => "screenshot_processed",
            CaptureEvent::Failed { .. } => "failed",
        }
    }
}

/// Result of [`ScreenshotPipeline::process_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedScreenshot {
    pub path: PathBuf,
    pub ocr_text: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Source
// ─────────────────────────────────────────────────────────────────────────────

/// Produces display frames, e.g. a virtual display mirroring the screen.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<RawFrame>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Saves screenshots, recognizes their text and announces the result.
pub struct ScreenshotPipeline {
    output_dir: PathBuf,
    recognizer: Option<SharedRecognizer>,
    events: broadcast::Sender<CaptureEvent>,
}

impl std::fmt::Debug for ScreenshotPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenshotPipeline")
            .field("output_dir", &self.output_dir)
            .field("recognizer", &self.recognizer.as_ref().map(|r| r.name()))
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl ScreenshotPipeline {
    /// Pipeline writing into `output_dir`, without OCR.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            output_dir: output_dir.into(),
            recognizer: None,
            events,
        }
    }

    /// Run OCR on every saved screenshot.
    pub fn with_recognizer(mut self, recognizer: SharedRecognizer) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Receive every [`CaptureEvent`] sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events.subscribe()
    }

    /// Pull one frame from `source` and process it.
    pub async fn capture_from(&self, source: &mut dyn FrameSource) -> Result<ProcessedScreenshot> {
        match source.next_frame().await {
            Ok(frame) => self.process_frame(frame).await,
            Err(e) => {
                self.publish(CaptureEvent::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Crop `frame`, save it as PNG, OCR it and broadcast the outcome.
    ///
    /// OCR problems are logged and produce `ocr_text: None`. Any other
    /// failure is broadcast as [`CaptureEvent::Failed`] and returned.
    pub async fn process_frame(&self, frame: RawFrame) -> Result<ProcessedScreenshot> {
        let path = match self.save_frame(frame).await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Screenshot processing failed");
                self.publish(CaptureEvent::Failed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let ocr_text = self.recognize(&path).await;
        info!(
            path = %path.display(),
            has_text = ocr_text.is_some(),
            "Screenshot processed"
        );

        self.publish(CaptureEvent::ScreenshotProcessed {
            path: path.clone(),
            ocr_text: ocr_text.clone(),
        });
        Ok(ProcessedScreenshot { path, ocr_text })
    }

    async fn save_frame(&self, frame: RawFrame) -> Result<PathBuf> {
        frame.validate()?;
        let dir = self.output_dir.clone();
        let taken_at = Utc::now();

        tokio::task::spawn_blocking(move || {
            let image = crop_frame(&frame)?;
            save_png(&image, &dir, taken_at)
        })
        .await?
    }

    /// Noise-stripped OCR text, or `None`.
    async fn recognize(&self, path: &Path) -> Option<String> {
        let recognizer = self.recognizer.as_ref()?;
        match recognizer.recognize(path).await {
            Ok(raw) => essspace_text::strip_noise_lines(&raw),
            Err(e) => {
                warn!(
                    recognizer = recognizer.name(),
                    path = %path.display(),
                    error = %e,
                    "OCR failed, keeping screenshot without text"
                );
                None
            }
        }
    }

    fn publish(&self, event: CaptureEvent) {
        let kind = event.kind();
        // No subscribers is fine.
        if self.events.send(event).is_err() {
            debug!(kind, "No capture event subscribers");
        }
    }
}

/// Frames served from memory, in order.
#[derive(Debug, Default)]
pub struct QueuedFrames {
    frames: std::collections::VecDeque<RawFrame>,
}

impl QueuedFrames {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

#[async_trait]
impl FrameSource for QueuedFrames {
    async fn next_frame(&mut self) -> Result<RawFrame> {
        self.frames
            .pop_front()
            .ok_or_else(|| CaptureError::Source("no frame available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::StaticRecognizer;
    use std::sync::Arc;

    fn solid_frame(width: u32, height: u32, padding: usize) -> RawFrame {
        let row_stride = width as usize * 4 + padding;
        RawFrame {
            width,
            height,
            pixel_stride: 4,
            row_stride,
            data: vec![200; row_stride * height as usize],
        }
    }

    #[tokio::test]
    async fn test_process_frame_saves_and_broadcasts() {
        let dir = tempfile::tempdir().unwrap();
        let recognizer = Arc::new(StaticRecognizer::text(
            "9:41 AM LTE\nMeeting at noon\n_____\nBring slides",
        ));
        let pipeline = ScreenshotPipeline::new(dir.path()).with_recognizer(recognizer.clone());
        let mut events = pipeline.subscribe();

        let processed = pipeline.process_frame(solid_frame(8, 4, 16)).await.unwrap();

        assert!(processed.path.exists());
        let name = processed.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("screenshot_") && name.ends_with(".png"));
        assert_eq!(
            processed.ocr_text.as_deref(),
            Some("Meeting at noon\nBring slides")
        );
        assert_eq!(recognizer.seen(), vec![processed.path.clone()]);

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            CaptureEvent::ScreenshotProcessed {
                path: processed.path.clone(),
                ocr_text: processed.ocr_text.clone(),
            }
        );

        let saved = image::open(&processed.path).unwrap();
        assert_eq!((saved.width(), saved.height()), (8, 4));
    }

    #[tokio::test]
    async fn test_ocr_failure_yields_partial_result() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ScreenshotPipeline::new(dir.path())
            .with_recognizer(Arc::new(StaticRecognizer::failing("engine missing")));
        let mut events = pipeline.subscribe();

        let processed = pipeline.process_frame(solid_frame(2, 2, 0)).await.unwrap();
        assert!(processed.path.exists());
        assert!(processed.ocr_text.is_none());

        assert!(matches!(
            events.recv().await.unwrap(),
            CaptureEvent::ScreenshotProcessed { ocr_text: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_noise_only_text_becomes_none() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ScreenshotPipeline::new(dir.path())
            .with_recognizer(Arc::new(StaticRecognizer::text("YOUR PAST SEARCHES\n---")));

        let processed = pipeline.process_frame(solid_frame(2, 2, 0)).await.unwrap();
        assert!(processed.ocr_text.is_none());
    }

    #[tokio::test]
    async fn test_invalid_frame_broadcasts_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ScreenshotPipeline::new(dir.path());
        let mut events = pipeline.subscribe();

        let mut frame = solid_frame(4, 4, 0);
        frame.data.truncate(10);

        let err = pipeline.process_frame(frame).await.unwrap_err();
        assert!(matches!(err, CaptureError::InvalidFrame(_)));
        assert!(matches!(
            events.recv().await.unwrap(),
            CaptureEvent::Failed { .. }
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_capture_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ScreenshotPipeline::new(dir.path());
        let mut source = QueuedFrames::new([solid_frame(3, 3, 4)]);

        let processed = pipeline.capture_from(&mut source).await.unwrap();
        assert!(processed.path.exists());
        assert!(processed.ocr_text.is_none());

        let err = pipeline.capture_from(&mut source).await.unwrap_err();
        assert!(matches!(err, CaptureError::Source(_)));
    }

    #[tokio::test]
    async fn test_process_without_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ScreenshotPipeline::new(dir.path());
        assert!(pipeline.process_frame(solid_frame(1, 1, 0)).await.is_ok());
    }
}

//! Capture pipeline for Essspace.
//!
//! Turns raw display frames and imported photos into PNG files plus the text
//! recognized in them.
//!
//! ```text
//! FrameSource ──► RawFrame ──► crop (drop stride padding) ──► screenshot_<ms>.png
//!                                                                   │
//!                                              TextRecognizer (OCR) ◄┘
//!                                                                   │
//!                       broadcast: CaptureEvent::ScreenshotProcessed { path, ocr_text }
//! ```
//!
//! Photos from the camera or gallery go through [`import_image`], which
//! downscales for OCR and reflows the recognized text.

pub mod error;
pub mod frame;
pub mod import;
pub mod ocr;
pub mod pipeline;

pub use error::{CaptureError, Result};
pub use frame::{
    DEFAULT_MAX_OCR_SIZE, RGBA_PIXEL_STRIDE, RawFrame, crop_frame, resize_for_ocr, save_png,
    screenshot_file_name,
};
pub use import::{ImportedImage, import_image};
pub use ocr::{SharedRecognizer, StaticRecognizer, TesseractRecognizer, TextRecognizer};
pub use pipeline::{
    CaptureEvent, DEFAULT_EVENT_CAPACITY, FrameSource, ProcessedScreenshot, QueuedFrames,
    ScreenshotPipeline,
};

//! Raw display frames and the image operations applied to them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::{CaptureError, Result};

/// Bytes per pixel of an RGBA_8888 frame.
pub const RGBA_PIXEL_STRIDE: usize = 4;

/// Longest side handed to OCR unless configured otherwise.
pub const DEFAULT_MAX_OCR_SIZE: u32 = 2048;

// ─────────────────────────────────────────────────────────────────────────────
// Raw Frame
// ─────────────────────────────────────────────────────────────────────────────

/// One RGBA_8888 frame as delivered by a display surface.
///
/// Hardware buffers may pad each row: `row_stride` can exceed
/// `pixel_stride * width`. The padding is dropped by [`crop_frame`].
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel.
    pub pixel_stride: usize,
    /// Bytes per row, padding included.
    pub row_stride: usize,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_stride", &self.pixel_stride)
            .field("row_stride", &self.row_stride)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RawFrame {
    /// A tightly packed RGBA frame (no row padding).
    pub fn packed(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixel_stride: RGBA_PIXEL_STRIDE,
            row_stride: width as usize * RGBA_PIXEL_STRIDE,
            data,
        }
    }

    /// Bytes of visible pixels in one row.
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).saturating_mul(self.pixel_stride)
    }

    /// Padding bytes at the end of each row.
    pub fn row_padding(&self) -> usize {
        self.row_stride.saturating_sub(self.row_bytes())
    }

    /// Check that the geometry is usable and the buffer is large enough.
    ///
    /// The last row does not need to carry padding.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::InvalidFrame(format!(
                "empty frame {}x{}",
                self.width, self.height
            )));
        }
        if self.pixel_stride != RGBA_PIXEL_STRIDE {
            return Err(CaptureError::InvalidFrame(format!(
                "unsupported pixel stride {} (expected {})",
                self.pixel_stride, RGBA_PIXEL_STRIDE
            )));
        }
        if self.row_stride < self.row_bytes() {
            return Err(CaptureError::InvalidFrame(format!(
                "row stride {} is smaller than a row of {} bytes",
                self.row_stride,
                self.row_bytes()
            )));
        }

        let required = self
            .row_stride
            .checked_mul(self.height as usize - 1)
            .and_then(|n| n.checked_add(self.row_bytes()))
            .ok_or_else(|| {
                CaptureError::InvalidFrame(format!(
                    "row stride {} overflows a {}-row frame",
                    self.row_stride, self.height
                ))
            })?;
        if self.data.len() < required {
            return Err(CaptureError::InvalidFrame(format!(
                "buffer holds {} bytes, frame needs {}",
                self.data.len(),
                required
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy the visible pixels of `frame` into an image, dropping row padding.
pub fn crop_frame(frame: &RawFrame) -> Result<RgbaImage> {
    frame.validate()?;

    let row_bytes = frame.row_bytes();
    let mut pixels = Vec::with_capacity(row_bytes * frame.height as usize);
    for row in 0..frame.height as usize {
        let start = row * frame.row_stride;
        pixels.extend_from_slice(&frame.data[start..start + row_bytes]);
    }

    debug!(
        width = frame.width,
        height = frame.height,
        row_padding = frame.row_padding(),
        "Cropped frame"
    );

    RgbaImage::from_raw(frame.width, frame.height, pixels).ok_or_else(|| {
        CaptureError::InvalidFrame("pixel buffer does not match frame size".to_string())
    })
}

/// Downscale so neither side exceeds `max_size`, keeping the aspect ratio.
///
/// Images already within bounds are returned unchanged. Each side of the
/// result is at least one pixel.
pub fn resize_for_ocr(image: DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || max_size == 0 {
        return image;
    }
    if width <= max_size && height <= max_size {
        return image;
    }

    let ratio = width as f64 / height as f64;
    let (new_width, new_height) = if ratio > 1.0 {
        (max_size, ((max_size as f64 / ratio) as u32).max(1))
    } else {
        (((max_size as f64 * ratio) as u32).max(1), max_size)
    };

    debug!(width, height, new_width, new_height, "Resizing image for OCR");
    image.resize_exact(new_width, new_height, FilterType::Triangle)
}

/// File name for a screenshot taken at `taken_at`.
pub fn screenshot_file_name(taken_at: DateTime<Utc>) -> String {
    format!("screenshot_{}.png", taken_at.timestamp_millis())
}

/// Write `image` as `dir/screenshot_<epoch-millis>.png`, creating `dir` if needed.
pub fn save_png(image: &RgbaImage, dir: &Path, taken_at: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| CaptureError::io(dir, e))?;

    let path = dir.join(screenshot_file_name(taken_at));
    image.save_with_format(&path, ImageFormat::Png)?;

    debug!(path = %path.display(), "Saved screenshot");
    Ok(path)
}

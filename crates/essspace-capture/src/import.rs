//! Photo import: the camera and gallery flows.

use std::path::{Path, PathBuf};

use image::{GenericImageView, ImageFormat};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{CaptureError, Result};
use crate::frame::resize_for_ocr;
use crate::ocr::TextRecognizer;

/// A photo ready to become a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedImage {
    /// The original file, untouched.
    pub path: PathBuf,
    /// Reflowed OCR text, `None` if OCR failed or found nothing.
    pub ocr_text: Option<String>,
}

/// Recognize the text in a photo.
///
/// Large photos are downscaled into a scratch PNG so neither side exceeds
/// `max_size`; the original file is never modified. A file that cannot be
/// decoded is an error. OCR failures are logged and yield `ocr_text: None`.
pub async fn import_image(
    path: &Path,
    recognizer: &dyn TextRecognizer,
    max_size: u32,
) -> Result<ImportedImage> {
    if !path.is_file() {
        return Err(CaptureError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "image file not found"),
        ));
    }

    let source = path.to_path_buf();
    let scratch = tokio::task::spawn_blocking(move || prepare_for_ocr(&source, max_size)).await??;
    let ocr_input = scratch.as_ref().map_or(path, |f| f.path());

    let ocr_text = match recognizer.recognize(ocr_input).await {
        Ok(raw) => {
            let text = essspace_text::reflow_ocr_text(&raw);
            (!text.is_empty()).then_some(text)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "OCR failed for imported image");
            None
        }
    };

    Ok(ImportedImage {
        path: path.to_path_buf(),
        ocr_text,
    })
}

/// Decode the image and, if it is too large, write a downscaled copy.
///
/// Returns `None` when the original can be used as is.
fn prepare_for_ocr(path: &Path, max_size: u32) -> Result<Option<NamedTempFile>> {
    let image = image::open(path)?;
    let original = image.dimensions();
    let resized = resize_for_ocr(image, max_size);

    if resized.dimensions() == original {
        return Ok(None);
    }

    let scratch = tempfile::Builder::new()
        .prefix("essspace-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| CaptureError::io(&std::env::temp_dir(), e))?;
    resized.save_with_format(scratch.path(), ImageFormat::Png)?;

    debug!(
        original = ?original,
        resized = ?resized.dimensions(),
        "Downscaled image for OCR"
    );
    Ok(Some(scratch))
}

//! Capture view-state.
//!
//! A capture flow spans several steps: take a photo or screenshot, optionally
//! record a voice memo, then save. [`CaptureSession`] carries the paths and
//! text produced by one step to the next and builds the final [`Note`].

use std::path::Path;

use essspace_capture::CaptureEvent;
use essspace_store::Note;
use essspace_text::combine_capture_text;
use tracing::debug;

/// Title of a note built from a photo or screenshot plus an optional memo.
pub const IMAGE_NOTE_TITLE: &str = "Note for Image";
/// Title of a voice note whose transcript has text.
pub const TRANSCRIBED_NOTE_TITLE: &str = "Transcribed Note";
/// Title of a voice note without a usable transcript.
pub const AUDIO_NOTE_TITLE: &str = "Audio Note";
/// Title of a screenshot saved without a memo.
pub const SCREENSHOT_NOTE_TITLE: &str = "Screenshot Note";

/// A processed screenshot waiting for the user to decide what to do with it:
/// record a memo for it, or save it as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotPrompt {
    pub path: String,
    pub ocr_text: Option<String>,
}

/// View-state for one capture flow at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSession {
    captured_photo_path: Option<String>,
    ocr_text: Option<String>,
    audio_path: Option<String>,
    transcribed_text: Option<String>,
    screenshot_prompt: Option<ScreenshotPrompt>,
    show_prompt: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured_photo_path(&self) -> Option<&str> {
        self.captured_photo_path.as_deref()
    }

    pub fn ocr_text(&self) -> Option<&str> {
        self.ocr_text.as_deref()
    }

    pub fn audio_path(&self) -> Option<&str> {
        self.audio_path.as_deref()
    }

    pub fn transcribed_text(&self) -> Option<&str> {
        self.transcribed_text.as_deref()
    }

    /// The pending screenshot, if any.
    pub fn screenshot_prompt(&self) -> Option<&ScreenshotPrompt> {
        self.screenshot_prompt.as_ref()
    }

    /// Whether the host should ask the user about the pending screenshot.
    pub fn is_prompt_visible(&self) -> bool {
        self.show_prompt
    }

    // ─────────────────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Forget everything captured so far. The screenshot prompt is untouched.
    pub fn prepare_for_new_capture(&mut self) {
        debug!("Clearing captured note data");
        self.captured_photo_path = None;
        self.ocr_text = None;
        self.audio_path = None;
        self.transcribed_text = None;
    }

    /// Record the result of a photo step.
    ///
    /// The transcript is only replaced when one is given.
    pub fn set_captured_data(
        &mut self,
        photo_path: Option<String>,
        ocr_text: Option<String>,
        transcript: Option<String>,
    ) {
        debug!(
            photo = ?photo_path,
            has_ocr = ocr_text.is_some(),
            has_transcript = transcript.is_some(),
            "Captured data"
        );
        self.captured_photo_path = photo_path;
        self.ocr_text = ocr_text;
        if transcript.is_some() {
            self.transcribed_text = transcript;
        }
    }

    /// Remember the recording that belongs to the current capture.
    pub fn set_audio_path(&mut self, path: Option<String>) {
        self.audio_path = path;
    }

    /// A screenshot finished processing: hold it and raise the prompt.
    pub fn handle_screenshot_processed(&mut self, path: impl Into<String>, ocr_text: Option<String>) {
        let path = path.into();
        debug!(path = %path, has_ocr = ocr_text.is_some(), "Screenshot processed");
        self.screenshot_prompt = Some(ScreenshotPrompt { path, ocr_text });
        self.transcribed_text = None;
        self.show_prompt = true;
    }

    /// The user chose to record a memo for the pending screenshot.
    ///
    /// Moves the screenshot into the captured fields and closes the prompt.
    /// A previous recording is dropped; the transcript comes from the memo.
    pub fn prepare_for_audio_with_screenshot(&mut self) {
        let prompt = self.screenshot_prompt.take();
        self.captured_photo_path = prompt.as_ref().map(|p| p.path.clone());
        self.ocr_text = prompt.and_then(|p| p.ocr_text);
        self.audio_path = None;
        self.clear_screenshot_prompt();
    }

    /// Close the prompt and drop the pending screenshot.
    pub fn clear_screenshot_prompt(&mut self) {
        self.show_prompt = false;
        self.screenshot_prompt = None;
    }

    /// Feed a capture pipeline event into the session.
    pub fn apply(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::ScreenshotProcessed { path, ocr_text } => {
                self.handle_screenshot_processed(path_string(path), ocr_text.clone());
            }
            CaptureEvent::Failed { reason } => {
                debug!(reason = %reason, "Capture failed, session unchanged");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Note builders
    // ─────────────────────────────────────────────────────────────────────

    /// Build the note for the current capture after the memo step.
    ///
    /// `transcript` overrides the transcript held by the session. With a
    /// photo the body is the OCR text and the transcript joined by a
    /// separator; without one it is the transcript alone.
    pub fn build_capture_note(&self, transcript: Option<&str>) -> Note {
        let transcript = transcript
            .or(self.transcribed_text.as_deref())
            .filter(|t| !t.trim().is_empty());

        let mut note = Note::new();
        match self.captured_photo_path.as_deref() {
            Some(photo) => {
                note.title = Some(IMAGE_NOTE_TITLE.to_string());
                note.photo_path = Some(photo.to_string());
                note.text = combine_capture_text(self.ocr_text.as_deref(), transcript);
                note.ocr_text = self.ocr_text.clone();
            }
            None => {
                let title = if transcript.is_some() {
                    TRANSCRIBED_NOTE_TITLE
                } else {
                    AUDIO_NOTE_TITLE
                };
                note.title = Some(title.to_string());
                note.text = transcript.map(str::to_string);
            }
        }
        note.audio_path = self.audio_path.clone();
        note.transcribed_text = transcript.map(str::to_string);
        note
    }

    /// Build a note from the pending screenshot alone, with its OCR text as
    /// the body. `None` when no screenshot is pending.
    pub fn screenshot_note_as_is(&self) -> Option<Note> {
        let prompt = self.screenshot_prompt.as_ref()?;
        let mut note = Note::new().with_title(SCREENSHOT_NOTE_TITLE);
        note.photo_path = Some(prompt.path.clone());
        note.text = prompt.ocr_text.clone();
        note.ocr_text = prompt.ocr_text.clone();
        Some(note)
    }

    /// Build a typed note. `None` when both title and content are blank.
    pub fn text_note(title: &str, content: &str) -> Option<Note> {
        let title = non_blank(title);
        let content = non_blank(content);
        if title.is_none() && content.is_none() {
            return None;
        }

        let mut note = Note::new();
        note.title = title;
        note.text = content;
        Some(note)
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

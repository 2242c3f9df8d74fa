//! Note types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Note ID
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of a stored note.
///
/// Assigned by the store on insert. [`NoteId::UNSAVED`] marks a note that has
/// not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl NoteId {
    /// Id of a note that has not been inserted yet.
    pub const UNSAVED: NoteId = NoteId(0);

    /// Whether this id was assigned by the store.
    pub fn is_saved(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(NoteId)
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        NoteId(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Note
// ─────────────────────────────────────────────────────────────────────────────

/// A captured note: media paths plus the text derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: Option<String>,
    pub photo_path: Option<String>,
    pub audio_path: Option<String>,
    /// Combined body shown to the user (OCR text and/or transcript, or typed text).
    pub text: Option<String>,
    pub ocr_text: Option<String>,
    pub transcribed_text: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hyperlinks extracted from `text`.
    #[serde(default)]
    pub links: Vec<String>,
    /// Whether `text` is markdown rather than plain text.
    pub is_markdown: bool,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

impl Note {
    /// Create an empty, unsaved note timestamped now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::UNSAVED,
            title: None,
            photo_path: None,
            audio_path: None,
            text: None,
            ocr_text: None,
            transcribed_text: None,
            summary: None,
            tags: Vec::new(),
            links: Vec::new(),
            is_markdown: true,
            created_at: now,
            last_modified: now,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_photo_path(mut self, path: impl Into<String>) -> Self {
        self.photo_path = Some(path.into());
        self
    }

    pub fn with_audio_path(mut self, path: impl Into<String>) -> Self {
        self.audio_path = Some(path.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_ocr_text(mut self, text: impl Into<String>) -> Self {
        self.ocr_text = Some(text.into());
        self
    }

    pub fn with_transcribed_text(mut self, text: impl Into<String>) -> Self {
        self.transcribed_text = Some(text.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Add a tag (ignored if already present).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    pub fn with_markdown(mut self, is_markdown: bool) -> Self {
        self.is_markdown = is_markdown;
        self
    }

    /// Whether the note holds any content: a photo, an audio file, or non-blank text.
    pub fn has_content(&self) -> bool {
        let has_text = [&self.text, &self.ocr_text, &self.transcribed_text]
            .into_iter()
            .flatten()
            .any(|t| !t.trim().is_empty());
        self.photo_path.is_some() || self.audio_path.is_some() || has_text
    }

    /// Replace the body and bump the modification time.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
        self.touch();
    }

    /// Mark the note as modified now.
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Title to show in listings: the title, else the start of the body.
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }
        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => text.lines().next().unwrap_or(text).to_string(),
            None => "Untitled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_unsaved_markdown() {
        let note = Note::new();
        assert_eq!(note.id, NoteId::UNSAVED);
        assert!(!note.id.is_saved());
        assert!(note.is_markdown);
        assert_eq!(note.created_at, note.last_modified);
    }

    #[test]
    fn test_has_content() {
        assert!(!Note::new().has_content());
        assert!(!Note::new().with_text("   ").has_content());
        assert!(Note::new().with_photo_path("/p.png").has_content());
        assert!(Note::new().with_audio_path("/a.m4a").has_content());
        assert!(Note::new().with_transcribed_text("hi").has_content());
    }

    #[test]
    fn test_with_tag_deduplicates() {
        let note = Note::new().with_tag("a").with_tag("b").with_tag("a");
        assert_eq!(note.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_display_title_fallbacks() {
        assert_eq!(Note::new().with_title("T").display_title(), "T");
        assert_eq!(
            Note::new().with_text("first line\nsecond").display_title(),
            "first line"
        );
        assert_eq!(Note::new().display_title(), "Untitled");
    }

    #[test]
    fn test_note_id_parse_and_display() {
        let id: NoteId = " 42 ".parse().unwrap();
        assert_eq!(id, NoteId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<NoteId>().is_err());
    }
}

//! Small string helpers shared by the capture flows and the CLI.

/// Separator placed between OCR text and a transcript in a combined note body.
pub const CAPTURE_SEPARATOR: &str = "\n\n---\n\n";

/// Truncate a string to at most `max_chars` characters, appending `...` if truncated.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let head: String = text.chars().take(max_chars - 3).collect();
    format!("{head}...")
}

/// Count words in a string (whitespace-separated).
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Build a note body from the OCR text of an image and a spoken transcript.
///
/// Blank parts are skipped; when both are present they are joined with
/// [`CAPTURE_SEPARATOR`]. Returns `None` when neither part has content.
pub fn combine_capture_text(ocr_text: Option<&str>, transcript: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [ocr_text, transcript]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(CAPTURE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello world", 5), "he...");
        assert_eq!(truncate("hi", 5), "hi");
        assert_eq!(truncate("hello world", 50), "hello world");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 6), "hél...");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("hello world foo"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_combine_both_parts() {
        assert_eq!(
            combine_capture_text(Some("receipt total 12.50"), Some("lunch with Sam")),
            Some("receipt total 12.50\n\n---\n\nlunch with Sam".to_string())
        );
    }

    #[test]
    fn test_combine_skips_blank_parts() {
        assert_eq!(
            combine_capture_text(Some("  "), Some("spoken only")),
            Some("spoken only".to_string())
        );
        assert_eq!(
            combine_capture_text(Some("seen only"), None),
            Some("seen only".to_string())
        );
        assert_eq!(combine_capture_text(None, Some("")), None);
    }
}

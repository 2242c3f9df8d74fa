//! Reflow of OCR output for reading.
//!
//! Recognizers emit one line per visual line, so a sentence that wrapped on
//! the page arrives split across several lines. Reflowing joins those lines
//! back into paragraphs while keeping blank-line paragraph breaks.

use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Join OCR lines into paragraphs.
///
/// Lines inside a paragraph are joined with a single space, runs of
/// whitespace collapse to one space, and paragraphs stay separated by exactly
/// one blank line.
pub fn reflow_ocr_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    let collapsed = EXCESS_NEWLINES.replace_all(joined.trim(), "\n\n");

    collapsed
        .split("\n\n")
        .map(|paragraph| {
            WHITESPACE_RUN
                .replace_all(paragraph, " ")
                .trim()
                .to_string()
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_wrapped_lines() {
        assert_eq!(
            reflow_ocr_text("The quick brown\nfox jumps over\nthe lazy dog."),
            "The quick brown fox jumps over the lazy dog."
        );
    }

    #[test]
    fn test_keeps_paragraph_breaks() {
        assert_eq!(
            reflow_ocr_text("First para\nline two\n\nSecond para"),
            "First para line two\n\nSecond para"
        );
    }

    #[test]
    fn test_collapses_excess_blank_lines() {
        assert_eq!(reflow_ocr_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(reflow_ocr_text("a\n  \n \n\nb"), "a\n\nb");
    }

    #[test]
    fn test_collapses_spaces() {
        assert_eq!(reflow_ocr_text("  too    many   spaces  "), "too many spaces");
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(reflow_ocr_text(" \n\t "), "");
    }
}

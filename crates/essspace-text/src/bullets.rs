//! Sentence-per-bullet summarization.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\n]+").expect("valid sentence-break regex"));

/// Bullet marker prefixed to each fragment.
pub const BULLET: &str = "* ";

/// Split text into sentences and prefix each with a bullet.
///
/// Sentences end at periods or newlines. Blank fragments are dropped. Input
/// that yields no fragment (such as `"..."`) becomes a single bullet holding
/// the whole trimmed input. Blank input yields an empty string.
pub fn summarize_and_bullet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let sentences: Vec<&str> = SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return format!("{BULLET}{trimmed}");
    }

    sentences
        .iter()
        .map(|s| format!("{BULLET}{s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_bullet_per_sentence() {
        assert_eq!(
            summarize_and_bullet("Buy milk. Call Sam.\nBook flights"),
            "* Buy milk\n* Call Sam\n* Book flights"
        );
    }

    #[test]
    fn test_undelimited_input_is_one_bullet() {
        assert_eq!(summarize_and_bullet("just a phrase"), "* just a phrase");
    }

    #[test]
    fn test_delimiters_only_bullets_whole_input() {
        assert_eq!(summarize_and_bullet(" ... "), "* ...");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(summarize_and_bullet(""), "");
        assert_eq!(summarize_and_bullet("  \n "), "");
    }

    #[test]
    fn test_repeated_delimiters_collapse() {
        assert_eq!(
            summarize_and_bullet("First...\n\nSecond."),
            "* First\n* Second"
        );
    }
}

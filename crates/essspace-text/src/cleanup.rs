//! Line-level removal of OCR noise.
//!
//! Screenshots of phone UIs carry a lot of text that is not part of the
//! content the user cared about: the status-bar clock, search-history rows,
//! and log lines the on-device recognizer leaks into its output. Each of those
//! has a recognizable shape, matched here against a fixed pattern list.

use std::sync::LazyLock;

use regex::Regex;

/// Lines matching any of these (after trimming) are dropped.
static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Recognizer delegate log lines
        r"(?i)^Replacing \d+ out of \d+ node\(s\) with delegate.*$",
        // Search bar prompts
        r"(?i)^< Search for '[^']+'$",
        r"(?i)^YOUR PAST SEARCHES$",
        // Past-search rows
        r"^Q [A-Za-z0-9 ]+$",
        // Status-bar clock rows, e.g. "9:41 AM Fri"
        r"^\d{1,2}:\d{2} [APMapm.]{0,2} .*$",
        // Only symbols or underscores
        r"^[\W_]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("noise pattern is a valid regex"))
    .collect()
});

/// Returns true if a trimmed line is recognizable OCR noise.
pub fn is_noise_line(line: &str) -> bool {
    NOISE_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Strip known OCR noise from recognized text.
///
/// Lines are trimmed, blank lines are dropped, and lines matching a noise
/// pattern are removed. The remaining lines keep their order and are joined
/// with `\n`. Returns `None` when the input is blank or nothing survives.
pub fn strip_noise_lines(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let kept: Vec<&str> = raw
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_noise_line(line))
        .collect();

    let result = kept.join("\n");
    let result = result.trim();
    if result.is_empty() {
        None
    } else {
        Some(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert_eq!(strip_noise_lines(""), None);
        assert_eq!(strip_noise_lines("   \n\t\n"), None);
    }

    #[test]
    fn test_removes_each_noise_shape() {
        let raw = "\
Replacing 12 out of 40 node(s) with delegate (TfLiteXNNPackDelegate)
< Search for 'rust borrow checker'
your past searches
Q lifetimes explained
9:41 AM Fri 5G
-----
___
Actual content line";
        assert_eq!(
            strip_noise_lines(raw),
            Some("Actual content line".to_string())
        );
    }

    #[test]
    fn test_preserves_order_of_surviving_lines() {
        let raw = "first\n***\nsecond\n10:05 pm battery\nthird";
        assert_eq!(
            strip_noise_lines(raw),
            Some("first\nsecond\nthird".to_string())
        );
    }

    #[test]
    fn test_trims_lines_and_drops_blanks() {
        let raw = "   alpha   \n\n\n  beta\r\n";
        assert_eq!(strip_noise_lines(raw), Some("alpha\nbeta".to_string()));
    }

    #[test]
    fn test_all_noise_is_none() {
        assert_eq!(strip_noise_lines("====\nYOUR PAST SEARCHES\n"), None);
    }

    #[test]
    fn test_past_search_pattern_requires_q_prefix() {
        // Lowercase "q" and punctuation are not past-search rows
        assert!(!is_noise_line("q lowercase"));
        assert!(!is_noise_line("Q what is this?"));
        assert!(is_noise_line("Q what is this"));
    }

    #[test]
    fn test_clock_pattern() {
        assert!(is_noise_line("3:22 AM Wi-Fi"));
        assert!(is_noise_line("12:00 p. anything"));
        assert!(!is_noise_line("Meeting at 3:22"));
    }

    #[test]
    fn test_symbol_only_lines() {
        assert!(is_noise_line("• • •"));
        assert!(is_noise_line("_"));
        assert!(!is_noise_line("- item"));
        assert!(!is_noise_line("42"));

        // Letters outside ASCII are words, not symbols.
        assert!(!is_noise_line("日本語"));
        assert!(!is_noise_line("Ελληνικά"));
        assert!(is_noise_line("→ ★ —"));
        assert_eq!(
            strip_noise_lines("日本語\n★★★\nМосква").as_deref(),
            Some("日本語\nМосква")
        );
    }
}

//! Hyperlink extraction from note text.
//!
//! OCR output wraps long URLs across lines, so extraction runs in two steps:
//! [`prepare_for_link_extraction`] rejoins the wrapped pieces, then
//! [`extract_links`] matches web URLs and normalizes their scheme.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A URL followed by a line break and the next token.
static WRAPPED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://\S+)[ \t]*\r?\n[ \t]*(\S+)").expect("valid wrapped-url regex")
});

/// A URL whose query string got separated by spaces.
static DETACHED_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://\S+)[ \t]+(\?\S+)").expect("valid detached-query regex")
});

/// Web URL matcher: scheme URLs, `www.` hosts, and bare hosts with a common TLD.
static WEB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:https?://[^\s<>"'()]+|www\.[^\s<>"'()]+|(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+(?:com|org|net|edu|gov|io|dev|app|ai|co|me|info|biz|us|uk|de|fr|in|ly|gl|tv|xyz)\b(?:[/?#][^\s<>"'()]*)?)"#,
    )
    .expect("valid web-url regex")
});

/// Characters a wrapped URL may end with when the line break fell mid-URL.
const TAIL_CONNECTORS: &[char] = &['/', '-', '_', '=', '&', '#', '%'];

/// Characters a continuation line may start with when it belongs to the URL above.
const HEAD_CONNECTORS: &[char] = &['/', '?', '&', '=', '#', '%', '.'];

/// Punctuation that ends a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

/// Rejoin URLs that OCR split across lines or spaces.
///
/// A URL followed by a line break is merged with the next token when the URL
/// ends with a connector (`/`, `-`, `=`, ...) or the next token starts with one.
/// A query string separated from its URL by spaces is reattached. Both rules
/// are applied until the text stops changing.
pub fn prepare_for_link_extraction(text: &str) -> String {
    let mut processed = text.trim().to_string();
    if processed.is_empty() {
        return processed;
    }

    loop {
        let next = WRAPPED_URL
            .replace_all(&processed, |caps: &Captures| {
                let url = &caps[1];
                let continuation = &caps[2];
                if url.ends_with(TAIL_CONNECTORS) || continuation.starts_with(HEAD_CONNECTORS) {
                    format!("{url}{continuation}")
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
        let next = DETACHED_QUERY.replace_all(&next, "$1$2").into_owned();

        if next == processed {
            return processed;
        }
        processed = next;
    }
}

/// Extract the hyperlinks in a block of text.
///
/// URLs without a scheme get an `http://` prefix. Trailing sentence
/// punctuation is dropped, e-mail domains are skipped, and the result is
/// de-duplicated in first-occurrence order.
pub fn extract_links(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let prepared = prepare_for_link_extraction(text);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for m in WEB_URL.find_iter(&prepared) {
        if prepared[..m.start()].ends_with('@') {
            continue;
        }

        let raw = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if raw.is_empty() {
            continue;
        }

        let url = if has_scheme(raw) {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

fn has_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_scheme_and_www_links() {
        let links = extract_links("Visit https://example.com/path and www.rust-lang.org today");
        assert_eq!(
            links,
            vec!["https://example.com/path", "http://www.rust-lang.org"]
        );
    }

    #[test]
    fn test_bare_domain_gets_http_prefix() {
        assert_eq!(
            extract_links("see crates.io for more"),
            vec!["http://crates.io"]
        );
    }

    #[test]
    fn test_sentence_end_does_not_swallow_next_line() {
        let text = "Details at https://example.com.\nThanks";
        assert_eq!(prepare_for_link_extraction(text), text);
        assert_eq!(extract_links(text), vec!["https://example.com"]);
    }

    #[test]
    fn test_deduplicates_in_order() {
        let links = extract_links(
            "https://a.example.com then https://b.example.com then https://a.example.com",
        );
        assert_eq!(
            links,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_trailing_punctuation_is_dropped() {
        assert_eq!(
            extract_links("Go to https://foo.org."),
            vec!["https://foo.org"]
        );
        assert_eq!(
            extract_links("Links: https://foo.org/a, https://foo.org/b!"),
            vec!["https://foo.org/a", "https://foo.org/b"]
        );
    }

    #[test]
    fn test_skips_email_domains() {
        assert!(extract_links("mail me@example.com").is_empty());
    }

    #[test]
    fn test_blank_text_has_no_links() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("   ").is_empty());
        assert!(extract_links("no links in here").is_empty());
    }

    #[test]
    fn test_rejoins_url_wrapped_after_slash() {
        let prepared = prepare_for_link_extraction("Read https://example.com/docs/\nguide.html now");
        assert_eq!(prepared, "Read https://example.com/docs/guide.html now");
        assert_eq!(
            extract_links("Read https://example.com/docs/\nguide.html now"),
            vec!["https://example.com/docs/guide.html"]
        );
    }

    #[test]
    fn test_rejoins_continuation_starting_with_connector() {
        let prepared = prepare_for_link_extraction("https://example.com/search\n?q=rust&page=2");
        assert_eq!(prepared, "https://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_rejoins_multiple_wraps() {
        let prepared = prepare_for_link_extraction("https://example.com/a/\nb/\nc.html");
        assert_eq!(prepared, "https://example.com/a/b/c.html");
    }

    #[test]
    fn test_reattaches_detached_query() {
        let prepared = prepare_for_link_extraction("https://example.com/path ?id=7");
        assert_eq!(prepared, "https://example.com/path?id=7");
    }

    #[test]
    fn test_does_not_join_ordinary_next_line() {
        let text = "https://example.com/a\nNext line";
        assert_eq!(prepare_for_link_extraction(text), text);
        assert_eq!(extract_links(text), vec!["https://example.com/a"]);
    }

    #[test]
    fn test_uppercase_scheme_is_kept() {
        assert_eq!(
            extract_links("HTTPS://EXAMPLE.COM/X"),
            vec!["HTTPS://EXAMPLE.COM/X"]
        );
    }
}

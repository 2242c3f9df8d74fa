//! Text post-processing for captured notes.
//!
//! Every function in this crate is a pure string transform that runs on the
//! output of OCR or speech recognition before a note is persisted:
//!
//! - [`strip_noise_lines`]: drops UI chrome that OCR picks up from screenshots
//!   (search prompts, status-bar clocks, delegate log lines, symbol rows)
//! - [`reflow_ocr_text`]: rejoins lines that OCR broke mid-sentence
//! - [`extract_links`]: finds hyperlinks, including ones wrapped across lines
//! - [`summarize_and_bullet`]: turns prose into one bullet per sentence
//!
//! # Usage
//!
//! ```
//! use essspace_text::{extract_links, summarize_and_bullet, strip_noise_lines};
//!
//! let raw = "9:41 AM Fri\nRead the guide at https://example.com/docs\n____";
//! let cleaned = strip_noise_lines(raw).unwrap();
//! assert_eq!(cleaned, "Read the guide at https://example.com/docs");
//!
//! assert_eq!(extract_links(&cleaned), vec!["https://example.com/docs"]);
//! assert_eq!(summarize_and_bullet("One. Two."), "* One\n* Two");
//! ```

pub mod bullets;
pub mod cleanup;
pub mod links;
pub mod normalize;
pub mod text;

pub use bullets::summarize_and_bullet;
pub use cleanup::strip_noise_lines;
pub use links::{extract_links, prepare_for_link_extraction};
pub use normalize::reflow_ocr_text;
pub use text::{CAPTURE_SEPARATOR, combine_capture_text, truncate, word_count};

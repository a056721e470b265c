//! Text normalization applied to article bodies before summarization and storage.
//!
//! [`normalize`] is a pure function: it strips leftover markup tags, collapses
//! every whitespace run (newlines included) into a single space, trims, and
//! lowercases. Applying it twice gives the same result as applying it once.
//!
//! It never truncates. Every record builder caps content at
//! [`MAX_CONTENT_CHARS`](crate::extractor::content::MAX_CONTENT_CHARS), and
//! the processor applies the cap again after normalizing, since lowercasing
//! can add characters.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Normalize raw article text.
///
/// Returns an empty string for empty input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("<p>Hello\n\n  <b>World</b></p>"), "hello world");
/// ```
pub fn normalize(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }

    let text = TAG_RE.replace_all(raw_text, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = BLANK_LINES_RE.replace_all(text.trim(), "\n");
    text.to_lowercase()
}

//! Main-content resolution.
//!
//! 1. Drop non-content elements (scripts, styles, navigation, header, footer,
//!    aside, ads) from a working copy of the document.
//! 2. Across every content-container selector and every match, keep the single
//!    longest visible text of at least [`MIN_CANDIDATE_CHARS`]. Ties keep the
//!    first candidate seen.
//! 3. Under [`PARAGRAPH_FALLBACK_CHARS`]: use all `<p>` text joined with spaces
//!    if that is longer.
//! 4. Still under [`MIN_CANDIDATE_CHARS`]: use the whole `<body>` text.
//! 5. Truncate to [`MAX_CONTENT_CHARS`].

use super::visible_text;
use crate::errors::ExtractionError;
use crate::utils::{char_len, truncate_chars};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

pub const MIN_CANDIDATE_CHARS: usize = 100;
pub const PARAGRAPH_FALLBACK_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Elements removed before any content is measured.
pub const NON_CONTENT_SELECTOR: &str =
    "script, style, noscript, nav, header, footer, aside, advertisement, .advertisement";

/// Content containers, in evaluation order.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[class*="content"]"#,
    r#"[class*="post-content"]"#,
    r#"[class*="entry-content"]"#,
    r#"[class*="article-content"]"#,
    r#"[class*="post-body"]"#,
    r#"[class*="story-body"]"#,
    r#"[class*="article-body"]"#,
    "main",
    ".content",
    ".post",
    ".article",
    ".story",
];

static NON_CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse(NON_CONTENT_SELECTOR).unwrap());
static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// A block of text considered while picking the article body.
#[derive(Debug)]
struct Candidate {
    selector_priority: usize,
    text: String,
    length: usize,
}

/// Copy of `document` with every non-content element detached.
fn strip_non_content(document: &Html) -> Html {
    let mut working = document.clone();
    let ids: Vec<_> = working.select(&NON_CONTENT).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = working.tree.get_mut(id) {
            node.detach();
        }
    }
    working
}

fn best_container(document: &Html) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (selector_priority, selector) in CONTAINERS.iter().enumerate() {
        for element in document.select(selector) {
            let text = visible_text(element);
            let length = char_len(&text);
            let longer = best.as_ref().is_none_or(|b| length > b.length);
            if length >= MIN_CANDIDATE_CHARS && longer {
                best = Some(Candidate {
                    selector_priority,
                    text,
                    length,
                });
            }
        }
    }
    best
}

fn paragraph_text(document: &Html) -> String {
    document
        .select(&PARAGRAPH)
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .join(" ")
}

fn body_text(document: &Html) -> Option<String> {
    document.select(&BODY).next().map(visible_text)
}

/// Pick the article body.
///
/// # Errors
///
/// [`ExtractionError::EmptyContent`] when nothing visible remains.
pub fn resolve_content(document: &Html) -> Result<String, ExtractionError> {
    let working = strip_non_content(document);

    let mut content = match best_container(&working) {
        Some(candidate) => {
            debug!(
                selector = CONTENT_SELECTORS[candidate.selector_priority],
                chars = candidate.length,
                "Best content container"
            );
            candidate.text
        }
        None => String::new(),
    };

    if char_len(&content) < PARAGRAPH_FALLBACK_CHARS {
        let paragraphs = paragraph_text(&working);
        if char_len(&paragraphs) > char_len(&content) {
            debug!(chars = char_len(&paragraphs), "Using paragraph text");
            content = paragraphs;
        }
    }

    if char_len(&content) < MIN_CANDIDATE_CHARS {
        if let Some(body) = body_text(&working) {
            debug!(chars = char_len(&body), "Using whole body text");
            content = body;
        }
    }

    let content = truncate_chars(&content, MAX_CONTENT_CHARS);
    if content.is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(content.to_string())
}

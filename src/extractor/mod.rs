//! Heuristic article extraction from arbitrary HTML.
//!
//! A page is turned into a `(title, author, content)` triple by running three
//! independent fallback chains over the parsed document:
//!
//! | Field | Module | First choice | Last resort |
//! |-------|--------|--------------|-------------|
//! | title | [`title`] | first `<h1>` | `"Article from {host}"` |
//! | author | [`author`] | `<meta name="author">` | `"Unknown"` |
//! | content | [`content`] | longest content container | whole `<body>` text |
//!
//! Each chain is an ordered slice of [`Strategy`] functions evaluated by
//! [`first_accepted`]; the first value that passes the chain's acceptance
//! test wins. New strategies are added by inserting a function into a slice.
//!
//! The extractor does not enforce the minimum content length; callers
//! discard records that are too short (see [`crate::scrapers::web`]).

pub mod author;
pub mod content;
pub mod title;

use crate::errors::ExtractionError;
use crate::models::ExtractedRecord;
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};

/// One step of a fallback chain.
pub type Strategy = fn(&Html) -> Option<String>;

/// Run `strategies` in order and return the first trimmed value `accept` allows.
pub fn first_accepted<F>(document: &Html, strategies: &[Strategy], accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    strategies.iter().find_map(|strategy| {
        strategy(document)
            .map(|value| value.trim().to_string())
            .filter(|value| accept(value))
    })
}

/// Visible text of an element: every non-blank text node, trimmed and joined
/// with single spaces.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

/// Extract an article from raw `markup` fetched from `source_url`.
///
/// # Errors
///
/// [`ExtractionError::EmptyContent`] when every content strategy came up empty.
#[instrument(level = "debug", skip_all, fields(%source_url))]
pub fn extract(markup: &str, source_url: &str) -> Result<ExtractedRecord, ExtractionError> {
    let document = Html::parse_document(markup);

    let title = title::resolve_title(&document, source_url);
    let author = author::resolve_author(&document);
    let content = content::resolve_content(&document)?;

    debug!(%title, %author, content_chars = content.chars().count(), "Extracted article");
    Ok(ExtractedRecord {
        title,
        author,
        content,
        source_url: source_url.to_string(),
    })
}

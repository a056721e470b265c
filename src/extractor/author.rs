//! Author (byline) resolution.
//!
//! Meta tags are tried first, then a fixed list of byline selectors. Text
//! pulled from a byline element must look like a name: between 3 and 99
//! characters and free of markup, URL, and most punctuation characters.

use super::title::first_meta_content;
use super::{Strategy, first_accepted};
use crate::models::UNKNOWN_AUTHOR;
use crate::utils::char_len;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// Exclusive upper bound on author length.
pub const MAX_AUTHOR_CHARS: usize = 100;
/// Exclusive lower bound on byline text length.
pub const MIN_BYLINE_CHARS: usize = 2;

/// Byline selectors, most generic first.
pub const BYLINE_SELECTORS: &[&str] = &[
    r#"[class*="author"]"#,
    r#"[class*="byline"]"#,
    r#"[class*="writer"]"#,
    r#"[rel="author"]"#,
    ".author-name",
    ".byline",
    ".post-author",
    ".author",
    ".writer",
    ".by-author",
];

static META_AUTHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="author"]"#).unwrap());
static META_ARTICLE_AUTHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:author"]"#).unwrap());
static BYLINES: Lazy<Vec<Selector>> = Lazy::new(|| {
    BYLINE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>@#$%^&*()+=\[\]{}|\\:";'?,./]"#).unwrap());

const AUTHOR_STRATEGIES: &[Strategy] = &[meta_author, meta_article_author, byline];

/// True when `text` could plausibly be a person's name.
pub fn is_plausible_byline(text: &str) -> bool {
    let len = char_len(text);
    len > MIN_BYLINE_CHARS && len < MAX_AUTHOR_CHARS && !DISALLOWED.is_match(text)
}

fn meta_value(document: &Html, selector: &Selector) -> Option<String> {
    first_meta_content(document, selector)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && char_len(v) < MAX_AUTHOR_CHARS)
}

fn meta_author(document: &Html) -> Option<String> {
    meta_value(document, &META_AUTHOR)
}

fn meta_article_author(document: &Html) -> Option<String> {
    meta_value(document, &META_ARTICLE_AUTHOR)
}

fn byline(document: &Html) -> Option<String> {
    BYLINES.iter().find_map(|selector| {
        document
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .find(|text| is_plausible_byline(text))
    })
}

/// Pick the author, or [`UNKNOWN_AUTHOR`].
pub fn resolve_author(document: &Html) -> String {
    first_accepted(document, AUTHOR_STRATEGIES, |a| !a.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

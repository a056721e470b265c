//! Title resolution.
//!
//! Candidates, in order: first `<h1>`, `<title>`, `og:title`, `twitter:title`,
//! first `<h2>`. The first one with at least [`MIN_TITLE_CHARS`] characters
//! wins; otherwise the title is synthesized from the URL's host.

use super::{Strategy, first_accepted};
use crate::utils::{char_len, truncate_chars};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Shortest accepted title.
pub const MIN_TITLE_CHARS: usize = 4;
/// Longest stored title.
pub const MAX_TITLE_CHARS: usize = 200;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static TWITTER_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:title"]"#).unwrap());

const TITLE_STRATEGIES: &[Strategy] = &[
    first_h1,
    document_title,
    og_title,
    twitter_title,
    first_h2,
];

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// `content` attribute of the first element matching `selector`.
pub(crate) fn first_meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

fn first_h1(document: &Html) -> Option<String> {
    first_text(document, &H1)
}

fn document_title(document: &Html) -> Option<String> {
    first_text(document, &TITLE)
}

fn og_title(document: &Html) -> Option<String> {
    first_meta_content(document, &OG_TITLE)
}

fn twitter_title(document: &Html) -> Option<String> {
    first_meta_content(document, &TWITTER_TITLE)
}

fn first_h2(document: &Html) -> Option<String> {
    first_text(document, &H2)
}

/// `"Article from {host}"`, with the port when the URL has one.
pub fn fallback_title(source_url: &str) -> String {
    let netloc = Url::parse(source_url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| source_url.to_string());
    format!("Article from {netloc}")
}

/// Pick the page title, truncated to [`MAX_TITLE_CHARS`].
pub fn resolve_title(document: &Html, source_url: &str) -> String {
    let title = first_accepted(document, TITLE_STRATEGIES, |t| {
        char_len(t) >= MIN_TITLE_CHARS
    })
    .unwrap_or_else(|| fallback_title(source_url));
    truncate_chars(&title, MAX_TITLE_CHARS).to_string()
}

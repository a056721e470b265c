//! Quotes scraper for [quotes.toscrape.com](http://quotes.toscrape.com).
//!
//! The site is a scraping sandbox with stable, minimal markup, which makes it
//! the default source for trying the pipeline end to end.
//!
//! # Markup
//!
//! Each quote is a `div.quote` holding `span.text`, `small.author` and any
//! number of `a.tag` links. Quotes missing text or author are skipped.

use crate::fetcher::Fetcher;
use crate::models::ExtractedRecord;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub const QUOTES_URL: &str = "http://quotes.toscrape.com";

static QUOTE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.quote").unwrap());
static TEXT: Lazy<Selector> = Lazy::new(|| Selector::parse("span.text").unwrap());
static AUTHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("small.author").unwrap());
static TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("a.tag").unwrap());

/// Parse up to `limit` quotes out of a listing page. Every record points at `page_url`.
pub fn parse_quotes(markup: &str, page_url: &str, limit: usize) -> Vec<ExtractedRecord> {
    let document = Html::parse_document(markup);

    document
        .select(&QUOTE)
        .take(limit)
        .filter_map(|quote| {
            let text = quote.select(&TEXT).next()?.text().collect::<String>();
            let author = quote.select(&AUTHOR).next()?.text().collect::<String>();
            let tags = quote
                .select(&TAG)
                .map(|t| t.text().collect::<String>())
                .join(", ");

            Some(ExtractedRecord {
                title: format!("Quote by {author}"),
                author,
                content: format!("{text}\n\nTags: {tags}"),
                source_url: page_url.to_string(),
            })
        })
        .collect()
}

/// Fetch the quotes page and return up to `limit` quotes.
///
/// # Returns
///
/// The parsed quotes, or an empty vector when the page could not be fetched.
#[instrument(level = "info", skip(fetcher, timeout))]
pub async fn fetch_quotes(
    fetcher: &Fetcher,
    url: &str,
    limit: usize,
    timeout: Duration,
) -> Vec<ExtractedRecord> {
    let page = match fetcher.fetch(url, timeout).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Quotes page request failed");
            return Vec::new();
        }
    };

    let quotes = parse_quotes(&page.body, url, limit);
    debug!(bytes = page.body.len(), "Parsed quotes page");
    info!(count = quotes.len(), "Scraped quotes");
    quotes
}

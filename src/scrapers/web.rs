//! Generic web pages: fetch, extract, and enforce the minimum content length.
//!
//! Single URLs go straight through [`scrape_url`]; URL lists are fanned out
//! with the bounded [`dispatch`](crate::dispatcher::dispatch).

use crate::dispatcher::dispatch;
use crate::errors::{ExtractionError, ScrapeError};
use crate::extractor::extract;
use crate::fetcher::Fetcher;
use crate::models::{BatchJob, ExtractedRecord};
use crate::utils::char_len;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Records with less content than this are discarded.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Fetch `url` and extract an article from it.
///
/// # Errors
///
/// - [`ScrapeError::Fetch`] for timeouts, non-200 responses, and network errors
/// - [`ScrapeError::Extraction`] when no content, or fewer than
///   [`MIN_CONTENT_CHARS`] characters of it, could be extracted
#[instrument(level = "info", skip(fetcher, timeout))]
pub async fn scrape_url(
    fetcher: &Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<ExtractedRecord, ScrapeError> {
    let page = fetcher.fetch(url, timeout).await?;
    let record = extract(&page.body, &page.url)?;

    let length = char_len(&record.content);
    if length < MIN_CONTENT_CHARS {
        warn!(url = %page.url, length, "Insufficient content extracted");
        return Err(ExtractionError::InsufficientContent {
            length,
            minimum: MIN_CONTENT_CHARS,
        }
        .into());
    }

    info!(title = %record.title, chars = length, "Scraped article");
    Ok(record)
}

/// Scrape every URL in `job`, at most `job.max_concurrent` at a time.
///
/// Failed URLs are logged and left out of the result.
#[instrument(level = "info", skip_all, fields(urls = job.urls.len(), max_concurrent = job.max_concurrent))]
pub async fn scrape_batch(fetcher: &Fetcher, job: BatchJob) -> Vec<ExtractedRecord> {
    let timeout = job.timeout;
    dispatch(job.urls, job.max_concurrent, |url: String| {
        let fetcher = fetcher.clone();
        async move { scrape_url(&fetcher, &url, timeout).await }
    })
    .await
}

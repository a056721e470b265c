//! The scrape → normalize → summarize → store workflow.
//!
//! Per-record failures upstream of storage (fetch, extraction, summarization)
//! have already been absorbed by the time a record reaches this module. A
//! storage failure is the one error that stops the batch and reaches the caller.

use crate::errors::StoreError;
use crate::extractor::content::MAX_CONTENT_CHARS;
use crate::models::{ExtractedRecord, NewArticle};
use crate::normalize::normalize;
use crate::scrapers::{Scraper, Source};
use crate::store::ArticleStore;
use crate::summarizer::{GeminiSummarizer, RateLimited, Summarize, summarize_or_placeholder};
use crate::utils::truncate_chars;
use tracing::{info, instrument, warn};

/// Runs whole batches from a source identifier to stored article IDs.
#[derive(Debug)]
pub struct ArticleProcessor<S = RateLimited<GeminiSummarizer>> {
    store: ArticleStore,
    scraper: Scraper,
    summarizer: Option<S>,
    max_summary_input_chars: usize,
}

impl<S: Summarize> ArticleProcessor<S> {
    pub fn new(
        store: ArticleStore,
        scraper: Scraper,
        summarizer: Option<S>,
        max_summary_input_chars: usize,
    ) -> Self {
        if summarizer.is_none() {
            warn!("No summarizer configured; articles will be stored without summaries");
        }
        Self {
            store,
            scraper,
            summarizer,
            max_summary_input_chars,
        }
    }

    /// Normalize, summarize and store one record.
    async fn process_record(&self, record: ExtractedRecord) -> Result<i64, StoreError> {
        let content = truncate_chars(&normalize(&record.content), MAX_CONTENT_CHARS).to_string();
        let summary = summarize_or_placeholder(
            self.summarizer.as_ref(),
            &content,
            self.max_summary_input_chars,
        )
        .await;

        let article = NewArticle {
            title: record.title,
            author: record.author,
            content,
            summary,
            source_url: record.source_url,
        };
        let id = self.store.store(&article).await?;
        info!(id, title = %article.title, "Processed article");
        Ok(id)
    }

    /// Scrape up to `limit` records from `source` and store each one.
    ///
    /// # Returns
    ///
    /// The IDs of the stored articles, in the order they were stored.
    ///
    /// # Errors
    ///
    /// The first [`StoreError`]; records after it are not attempted.
    #[instrument(level = "info", skip(self))]
    pub async fn process_articles(&self, source: &str, limit: usize) -> Result<Vec<i64>, StoreError> {
        let records = self.scraper.scrape(&Source::parse(source), limit).await;
        if records.is_empty() {
            warn!("No articles scraped");
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.process_record(record).await?);
        }

        info!(count = ids.len(), "Batch stored");
        Ok(ids)
    }
}

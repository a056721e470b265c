//! Source adapters: how each kind of source identifier becomes a list of records.
//!
//! # Supported Sources
//!
//! | Identifier | Module | Method | Notes |
//! |------------|--------|--------|-------|
//! | `https://…`, `example.com/…` | [`web`] | Fetch + heuristic extraction | Comma-separated lists run through the dispatcher |
//! | `hackernews` | [`hackernews`] | Firebase JSON API | Link-only stories get a secondary extraction pass |
//! | `reddit:<subreddit>` | [`reddit`] | `hot.json` listing | Records built straight from JSON fields |
//! | `quotes` | [`quotes`] | HTML scraping | quotes.toscrape.com |
//!
//! # Common Patterns
//!
//! Every adapter returns `Vec<ExtractedRecord>` and never fails: request or
//! parse errors are logged and yield an empty (or shorter) list.

pub mod hackernews;
pub mod quotes;
pub mod reddit;
pub mod web;

use crate::fetcher::Fetcher;
use crate::models::{BatchJob, ExtractedRecord};
use std::time::Duration;
use tracing::{error, info, instrument};

/// A parsed source identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Quotes,
    HackerNews,
    Reddit { subreddit: String },
    Url(String),
    Urls(Vec<String>),
    Unknown(String),
}

impl Source {
    /// Interpret a user-supplied source identifier (case-insensitive keywords).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(Source::parse("hackernews"), Source::HackerNews);
    /// assert_eq!(Source::parse("reddit:rust"), Source::Reddit { subreddit: "rust".into() });
    /// ```
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        let lower = source.to_lowercase();

        if lower == "quotes" {
            Source::Quotes
        } else if lower == "hackernews" {
            Source::HackerNews
        } else if let Some(sub) = lower.strip_prefix("reddit:") {
            let subreddit = match sub.trim() {
                "" => reddit::DEFAULT_SUBREDDIT.to_string(),
                s => s.to_string(),
            };
            Source::Reddit { subreddit }
        } else if lower.starts_with("http://") || lower.starts_with("https://") || source.contains('.') {
            if source.contains(',') {
                Source::Urls(
                    source
                        .split(',')
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            } else {
                Source::Url(source.to_string())
            }
        } else {
            Source::Unknown(source.to_string())
        }
    }
}

/// Remote API roots used by the adapters. Overridable for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub hackernews: String,
    pub reddit: String,
    pub quotes: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            hackernews: hackernews::HACKERNEWS_API.to_string(),
            reddit: reddit::REDDIT_BASE.to_string(),
            quotes: quotes::QUOTES_URL.to_string(),
        }
    }
}

/// Routes a [`Source`] to the adapter that handles it.
#[derive(Debug, Clone)]
pub struct Scraper {
    fetcher: Fetcher,
    timeout: Duration,
    max_concurrent: usize,
    endpoints: Endpoints,
}

impl Scraper {
    pub fn new(fetcher: Fetcher, timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_concurrent,
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scrape up to `limit` records from `source`.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape(&self, source: &Source, limit: usize) -> Vec<ExtractedRecord> {
        let records = match source {
            Source::Quotes => {
                quotes::fetch_quotes(&self.fetcher, &self.endpoints.quotes, limit, self.timeout).await
            }
            Source::HackerNews => {
                hackernews::fetch_stories(
                    &self.fetcher,
                    &self.endpoints.hackernews,
                    limit,
                    self.timeout,
                )
                .await
            }
            Source::Reddit { subreddit } => {
                reddit::fetch_posts(
                    &self.fetcher,
                    &self.endpoints.reddit,
                    subreddit,
                    limit,
                    self.timeout,
                )
                .await
            }
            Source::Url(url) => match web::scrape_url(&self.fetcher, url, self.timeout).await {
                Ok(record) => vec![record],
                Err(e) => {
                    error!(%url, error = %e, "Scrape failed");
                    Vec::new()
                }
            },
            Source::Urls(urls) => {
                let job = BatchJob {
                    urls: urls.iter().take(limit).cloned().collect(),
                    max_concurrent: self.max_concurrent,
                    timeout: self.timeout,
                };
                web::scrape_batch(&self.fetcher, job).await
            }
            Source::Unknown(name) => {
                error!(source = %name, "Unknown source");
                Vec::new()
            }
        };
        info!(count = records.len(), "Scraped records");
        records
    }
}

//! Error types for each stage of the scrape → summarize → store pipeline.
//!
//! Every per-item error here is recoverable at the batch level: the item is
//! logged and dropped (or, for summarization, replaced with a placeholder).
//! Only [`StoreError`] is propagated out of a batch workflow.

use thiserror::Error;

/// A single HTTP fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Classify a `reqwest` failure for `url`.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// No usable article body could be pulled out of a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no content extracted")]
    EmptyContent,
    #[error("insufficient content extracted ({length} chars, need {minimum})")]
    InsufficientContent { length: usize, minimum: usize },
}

/// Fetching or extracting a single URL failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// The summarization service could not produce a summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarization API key is missing")]
    MissingApiKey,
    #[error("summarization request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("summarization API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("summarization API returned no text")]
    EmptyResponse,
}

/// The article store rejected an operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("could not prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// The optional YAML configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

//! Data models for scraped, stored, and analysed articles.
//!
//! - [`ExtractedRecord`]: one article pulled from a page or feed, before storage
//! - [`NewArticle`]: a normalized record plus its summary, ready to insert
//! - [`StoredArticle`]: a row read back from the article store
//! - [`BatchJob`]: a list of URLs to scrape with concurrency and timeout limits
//! - [`TableInfo`] / [`ContentAnalysis`]: aggregate views used by reports and exports

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Byline used when the author of an article could not be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// An article as produced by the extractor or a source adapter.
///
/// Records are never mutated after creation; normalization and summarization
/// produce a [`NewArticle`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Headline, at most 200 characters.
    pub title: String,
    /// Byline, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// Main body text, at most 10,000 characters.
    pub content: String,
    /// The URL the record was scraped from.
    pub source_url: String,
}

/// A record that has been normalized and summarized, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub summary: String,
    pub source_url: String,
}

/// An article row as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub summary: Option<String>,
    pub source_url: String,
    /// Insertion timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub created_at: String,
}

/// Host part of `url`, falling back to the input when it has none.
///
/// `"https://news.ycombinator.com/item?id=1"` -> `"news.ycombinator.com"`
pub fn source_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// A list of URLs consumed once by the dispatcher.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub urls: Vec<String>,
    pub max_concurrent: usize,
    pub timeout: Duration,
}

/// Which text column(s) a search should match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchField {
    #[default]
    All,
    Title,
    Author,
    Content,
    Summary,
}

impl SearchField {
    /// The column name, or `None` for [`SearchField::All`].
    pub fn column(self) -> Option<&'static str> {
        match self {
            SearchField::All => None,
            SearchField::Title => Some("title"),
            SearchField::Author => Some("author"),
            SearchField::Content => Some("content"),
            SearchField::Summary => Some("summary"),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().unwrap_or("all"))
    }
}

/// One column of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub nullable: bool,
}

/// Schema and size of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub columns: Vec<ColumnInfo>,
    pub total_rows: i64,
}

/// Length statistics over article bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentStats {
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub avg_length: Option<f64>,
    pub total_articles: i64,
}

/// Length statistics over non-empty summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_summaries: i64,
    pub avg_summary_length: Option<f64>,
    pub min_summary_length: Option<i64>,
    pub max_summary_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source_url: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    pub articles_count: i64,
}

/// Aggregate breakdown of the store used by `report` and `export`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub content_stats: ContentStats,
    pub summary_stats: SummaryStats,
    pub source_distribution: Vec<SourceCount>,
    pub author_distribution: Vec<AuthorCount>,
    pub timeline: Vec<DayCount>,
}

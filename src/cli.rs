//! Command-line interface definitions.
//!
//! Global options can be given as flags or environment variables and apply
//! to every subcommand.
//!
//! # Examples
//!
//! ```sh
//! # Scrape five quotes (the default source) into articles.db
//! article_scraper scrape
//!
//! # Scrape Hacker News into a custom database with summaries
//! GEMINI_API_KEY=... article_scraper --db-path news.db scrape --source hackernews --limit 10
//!
//! # Several pages at once, three in flight
//! article_scraper --max-concurrent 3 scrape --source "https://a.com/x,https://b.org/y"
//!
//! # Inspect what was stored
//! article_scraper view-db --full --limit 3
//! article_scraper search budget --field title
//! ```

use crate::models::SearchField;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to a config.yaml file
    #[arg(short, long, global = true, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Google Gemini API key; summaries are skipped without one
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, global = true, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    /// Maximum number of pages fetched at once
    #[arg(long, global = true)]
    pub max_concurrent: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape a source, summarize each article and store it
    Scrape {
        /// quotes, hackernews, reddit:<subreddit>, a URL, or comma-separated URLs
        #[arg(long, default_value = "quotes")]
        source: String,

        /// Maximum number of articles to scrape
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Fetch and extract a single URL without storing it
    TestScrape {
        url: String,
    },

    /// Show the stored summary for an article
    GetSummary {
        article_id: i64,
    },

    /// List every stored article
    ListArticles,

    /// Create the database schema
    InitDb,

    /// Detailed listing of the most recent articles
    ViewDb {
        /// Show content previews and full summaries
        #[arg(long)]
        full: bool,

        /// Number of articles to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Search stored articles
    Search {
        query: String,

        /// Column to search
        #[arg(long, value_enum, default_value_t = SearchField::All)]
        field: SearchField,
    },

    /// Export the database to a JSON file
    Export {
        /// Output file (defaults to articles_export_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a statistics report
    Report,
}

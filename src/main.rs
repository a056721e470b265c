//! # Article Scraper
//!
//! Scrapes web pages and feed APIs, extracts article text heuristically,
//! summarizes it with Google Gemini, and keeps the results in SQLite.
//!
//! ## Features
//!
//! - Generic pages: title, author and body found by ordered fallback chains
//! - Source adapters for Hacker News, Reddit and quotes.toscrape.com
//! - Bounded concurrency for URL lists (5 in flight by default)
//! - Rate-limited summaries with placeholder text when the API is unavailable
//! - Listing, search, JSON export and a statistics report over the database
//!
//! ## Usage
//!
//! ```sh
//! article_scraper scrape --source hackernews --limit 10
//! article_scraper view-db --full
//! ```
//!
//! ## Architecture
//!
//! 1. **Resolving**: the source identifier picks an adapter
//! 2. **Fetching**: pages are downloaded with browser headers (bounded fan-out)
//! 3. **Extracting**: title, author and content are resolved from the markup
//! 4. **Processing**: content is normalized, summarized and stored

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dispatcher;
mod errors;
mod extractor;
mod fetcher;
mod models;
mod normalize;
mod outputs;
mod processor;
mod scrapers;
mod store;
mod summarizer;
mod utils;

use cli::{Cli, Command};
use config::AppConfig;
use fetcher::Fetcher;
use models::SearchField;
use outputs::{console, json, report};
use processor::ArticleProcessor;
use scrapers::Scraper;
use store::ArticleStore;
use summarizer::{GeminiSummarizer, RateLimited};

/// Build the rate-limited summarizer, or `None` when no API key is configured.
fn build_summarizer(config: &AppConfig) -> Option<RateLimited<GeminiSummarizer>> {
    let key = config.gemini_api_key.as_deref()?;
    match GeminiSummarizer::new(key, &config.gemini_model) {
        Ok(client) => Some(RateLimited::new(client, config.summary_interval)),
        Err(e) => {
            warn!(error = %e, "Summarizer unavailable; continuing without summaries");
            None
        }
    }
}

fn build_scraper(config: &AppConfig) -> Result<Scraper, Box<dyn Error>> {
    let fetcher = Fetcher::new()?;
    Ok(Scraper::new(fetcher, config.timeout, config.max_concurrent))
}

#[instrument(level = "info", skip(config))]
async fn run_scrape(config: &AppConfig, source: &str, limit: usize) -> Result<(), Box<dyn Error>> {
    println!("Scraping {limit} articles from {source}...");

    let store = ArticleStore::open(&config.db_path).await?;
    let processor = ArticleProcessor::new(
        store,
        build_scraper(config)?,
        build_summarizer(config),
        config.max_summary_input_chars,
    );

    let ids = processor.process_articles(source, limit).await?;
    println!("{}", console::scrape_outcome(&ids));
    Ok(())
}

#[instrument(level = "info", skip(config))]
async fn run_test_scrape(config: &AppConfig, url: &str) -> Result<(), Box<dyn Error>> {
    let scraper = build_scraper(config)?;
    match scrapers::web::scrape_url(scraper.fetcher(), url, scraper.timeout()).await {
        Ok(record) => println!("{}", console::test_scrape(url, &record)),
        Err(e) => {
            error!(%url, error = %e, "Test scrape failed");
            println!("❌ Failed to scrape: {url}");
        }
    }
    Ok(())
}

async fn run_get_summary(store: &ArticleStore, id: i64) -> Result<(), Box<dyn Error>> {
    match store.get(id).await? {
        Some(article) => println!("{}", console::summary(&article)),
        None => println!("Article with ID {id} not found"),
    }
    Ok(())
}

async fn run_view_db(store: &ArticleStore, full: bool, limit: usize) -> Result<(), Box<dyn Error>> {
    let articles: Vec<_> = store.list().await?.into_iter().take(limit).collect();
    println!("{}", console::database_view(&articles, full));
    Ok(())
}

async fn run_search(store: &ArticleStore, query: &str, field: SearchField) -> Result<(), Box<dyn Error>> {
    let results = store.search(query, field).await?;
    println!("{}", console::search_results(query, field, &results));
    Ok(())
}

async fn run_report(store: &ArticleStore) -> Result<(), Box<dyn Error>> {
    println!("{}", report::build(store, Local::now()).await?);
    Ok(())
}

async fn run(config: &AppConfig, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Scrape { source, limit } => run_scrape(config, &source, limit).await,
        Command::TestScrape { url } => run_test_scrape(config, &url).await,
        Command::GetSummary { article_id } => {
            run_get_summary(&ArticleStore::open(&config.db_path).await?, article_id).await
        }
        Command::ListArticles => {
            let articles = ArticleStore::open(&config.db_path).await?.list().await?;
            println!("{}", console::article_list(&articles));
            Ok(())
        }
        Command::InitDb => {
            ArticleStore::open(&config.db_path).await?;
            println!("Database initialized successfully");
            Ok(())
        }
        Command::ViewDb { full, limit } => {
            run_view_db(&ArticleStore::open(&config.db_path).await?, full, limit).await
        }
        Command::Search { query, field } => {
            run_search(&ArticleStore::open(&config.db_path).await?, &query, field).await
        }
        Command::Export { output } => {
            let store = ArticleStore::open(&config.db_path).await?;
            let path = json::write_export(&store, output.as_deref()).await?;
            println!("Database exported to: {}", path.display());
            Ok(())
        }
        Command::Report => {
            run_report(&ArticleStore::open(&config.db_path).await?).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(command = ?args.command, "Parsed CLI arguments");

    let config = AppConfig::load(&args.global)?;

    let result = run(&config, args.command).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");

    result
}

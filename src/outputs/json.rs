//! JSON export of the whole database.
//!
//! # Output Structure
//!
//! ```text
//! {
//!   "export_date": "2025-05-06T14:03:11.123456+02:00",
//!   "table_info": { "columns": [...], "total_rows": 42 },
//!   "analysis":   { "content_stats": {...}, "summary_stats": {...}, ... },
//!   "articles":   [ { "id": 42, ..., "content_length": 1830, "summary_length": 310 }, ... ]
//! }
//! ```
//!
//! Without an explicit path the file is written to the working directory as
//! `articles_export_YYYYMMDD_HHMMSS.json`.

use crate::errors::StoreError;
use crate::models::{ContentAnalysis, StoredArticle, TableInfo};
use crate::store::ArticleStore;
use crate::utils::{char_len, ensure_parent_dir};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// One article row plus the derived length columns.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedArticle {
    #[serde(flatten)]
    pub article: StoredArticle,
    pub content_length: usize,
    pub summary_length: Option<usize>,
}

impl From<StoredArticle> for ExportedArticle {
    fn from(article: StoredArticle) -> Self {
        Self {
            content_length: char_len(&article.content),
            summary_length: article.summary.as_deref().map(char_len),
            article,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot {
    pub export_date: String,
    pub table_info: TableInfo,
    pub analysis: ContentAnalysis,
    pub articles: Vec<ExportedArticle>,
}

/// `articles_export_YYYYMMDD_HHMMSS.json` for `now`.
pub fn default_export_filename(now: DateTime<Local>) -> String {
    format!("articles_export_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Gather everything that goes into an export.
pub async fn build_snapshot(store: &ArticleStore) -> Result<ExportSnapshot, StoreError> {
    let articles = store
        .list()
        .await?
        .into_iter()
        .map(ExportedArticle::from)
        .collect();
    Ok(ExportSnapshot {
        export_date: Local::now().to_rfc3339(),
        table_info: store.table_info().await?,
        analysis: store.analysis().await?,
        articles,
    })
}

/// Write a pretty-printed snapshot to `output` (or the default filename).
///
/// # Returns
///
/// The path that was written.
#[instrument(level = "info", skip_all)]
pub async fn write_export(
    store: &ArticleStore,
    output: Option<&Path>,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_export_filename(Local::now())),
    };

    let snapshot = build_snapshot(store).await?;
    let json = serde_json::to_string_pretty(&snapshot)?;

    ensure_parent_dir(&path).await?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = snapshot.articles.len(), "Wrote database export");

    Ok(path)
}

//! SQLite persistence for processed articles.
//!
//! A single `articles` table holds every record the pipeline produced. Rows
//! are only ever appended; the read side serves the CLI listing, search,
//! export and report commands.
//!
//! # Schema
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `id` | `INTEGER` | primary key, autoincrement |
//! | `title` | `TEXT NOT NULL` | |
//! | `author` | `TEXT` | |
//! | `content` | `TEXT NOT NULL` | normalized text |
//! | `summary` | `TEXT` | summary or placeholder |
//! | `source_url` | `TEXT NOT NULL` | |
//! | `created_at` | `TIMESTAMP` | defaults to `CURRENT_TIMESTAMP` (UTC) |

use crate::errors::StoreError;
use crate::models::{
    AuthorCount, ColumnInfo, ContentAnalysis, ContentStats, DayCount, NewArticle, SearchField,
    SourceCount, StoredArticle, SummaryStats, TableInfo,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Database file used when none is configured.
pub const DEFAULT_DB_PATH: &str = "articles.db";

const CREATE_ARTICLES: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT,
        content TEXT NOT NULL,
        summary TEXT,
        source_url TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const ARTICLE_COLUMNS: &str = "id, title, author, content, summary, source_url, created_at";
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Handle to the article database.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    pool: SqlitePool,
    path: PathBuf,
}

fn article_from_row(row: &SqliteRow) -> Result<StoredArticle, sqlx::Error> {
    Ok(StoredArticle {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        content: row.try_get("content")?,
        summary: row.try_get("summary")?,
        source_url: row.try_get("source_url")?,
        created_at: row
            .try_get::<Option<String>, _>("created_at")?
            .unwrap_or_default(),
    })
}

impl ArticleStore {
    /// Open (creating if needed) the database at `path` and ensure the schema exists.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool, path };
        store.migrate().await?;
        info!("Database ready");
        Ok(store)
    }

    /// Create the `articles` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ARTICLES).execute(&self.pool).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one article and return its new ID.
    #[instrument(level = "info", skip_all, fields(title = %article.title))]
    pub async fn store(&self, article: &NewArticle) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO articles (title, author, content, summary, source_url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&article.title)
        .bind(&article.author)
        .bind(&article.content)
        .bind(&article.summary)
        .bind(&article.source_url)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Stored article");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<StoredArticle>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(article_from_row).transpose()?)
    }

    /// Every article, newest first.
    pub async fn list(&self) -> Result<Vec<StoredArticle>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles {NEWEST_FIRST}"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(article_from_row).collect::<Result<_, _>>()?)
    }

    /// Substring search (`LIKE %query%`) over one column or all text columns, newest first.
    #[instrument(level = "info", skip(self))]
    pub async fn search(
        &self,
        query: &str,
        field: SearchField,
    ) -> Result<Vec<StoredArticle>, StoreError> {
        let pattern = format!("%{query}%");
        let rows = match field.column() {
            Some(column) => {
                sqlx::query(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles WHERE {column} LIKE ? {NEWEST_FIRST}"
                ))
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles \
                     WHERE title LIKE ? OR author LIKE ? OR content LIKE ? OR summary LIKE ? \
                     {NEWEST_FIRST}"
                ))
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
        };
        let found: Vec<StoredArticle> = rows.iter().map(article_from_row).collect::<Result<_, _>>()?;
        info!(count = found.len(), "Search complete");
        Ok(found)
    }

    /// Column layout and row count of the `articles` table.
    pub async fn table_info(&self) -> Result<TableInfo, StoreError> {
        let columns = sqlx::query("PRAGMA table_info(articles)")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(ColumnInfo {
                    name: row.try_get("name")?,
                    kind: row.try_get("type")?,
                    nullable: row.try_get::<i64, _>("notnull")? == 0,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let total_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;

        Ok(TableInfo {
            columns,
            total_rows,
        })
    }

    /// Aggregate statistics over the whole table.
    #[instrument(level = "info", skip_all)]
    pub async fn analysis(&self) -> Result<ContentAnalysis, StoreError> {
        let row = sqlx::query(
            "SELECT MIN(LENGTH(content)) AS min_length, MAX(LENGTH(content)) AS max_length, \
             AVG(LENGTH(content)) AS avg_length, COUNT(*) AS total_articles FROM articles",
        )
        .fetch_one(&self.pool)
        .await?;
        let content_stats = ContentStats {
            min_length: row.try_get("min_length")?,
            max_length: row.try_get("max_length")?,
            avg_length: row.try_get("avg_length")?,
            total_articles: row.try_get("total_articles")?,
        };

        let row = sqlx::query(
            "SELECT COUNT(*) AS total_summaries, AVG(LENGTH(summary)) AS avg_summary_length, \
             MIN(LENGTH(summary)) AS min_summary_length, MAX(LENGTH(summary)) AS max_summary_length \
             FROM articles WHERE summary IS NOT NULL AND summary != ''",
        )
        .fetch_one(&self.pool)
        .await?;
        let summary_stats = SummaryStats {
            total_summaries: row.try_get("total_summaries")?,
            avg_summary_length: row.try_get("avg_summary_length")?,
            min_summary_length: row.try_get("min_summary_length")?,
            max_summary_length: row.try_get("max_summary_length")?,
        };

        let source_distribution = sqlx::query(
            "SELECT source_url, COUNT(*) AS count FROM articles \
             GROUP BY source_url ORDER BY count DESC, source_url",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(SourceCount {
                source_url: row.try_get("source_url")?,
                count: row.try_get("count")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let author_distribution = sqlx::query(
            "SELECT author, COUNT(*) AS count FROM articles \
             WHERE author IS NOT NULL AND author != '' \
             GROUP BY author ORDER BY count DESC, author LIMIT 20",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(AuthorCount {
                author: row.try_get("author")?,
                count: row.try_get("count")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let timeline = sqlx::query(
            "SELECT DATE(created_at) AS date, COUNT(*) AS articles_count FROM articles \
             GROUP BY DATE(created_at) ORDER BY date DESC LIMIT 30",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(DayCount {
                date: row
                    .try_get::<Option<String>, _>("date")?
                    .unwrap_or_default(),
                articles_count: row.try_get("articles_count")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(ContentAnalysis {
            content_stats,
            summary_stats,
            source_distribution,
            author_distribution,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn article(title: &str, author: &str, content: &str, summary: &str, url: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
            summary: summary.to_string(),
            source_url: url.to_string(),
        }
    }

    async fn seeded() -> (tempfile::TempDir, ArticleStore) {
        let dir = tempdir().unwrap();
        let store = ArticleStore::open(dir.path().join("articles.db")).await.unwrap();
        store
            .store(&article("Rust 2024", "Ferris", "the rust edition ships", "Edition out.", "https://blog.rust-lang.org/a"))
            .await
            .unwrap();
        store
            .store(&article("Budget vote", "Jane Doe", "council approves the budget", "", "https://news.example.com/b"))
            .await
            .unwrap();
        store
            .store(&article("More Rust", "Ferris", "async traits land", "Async traits.", "https://blog.rust-lang.org/a"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_nested_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/articles.db");
        let store = ArticleStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
        // Reopening an existing database keeps working.
        ArticleStore::open(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let (_dir, store) = seeded().await;
        let id = store
            .store(&article("T", "A", "c", "s", "https://x.org"))
            .await
            .unwrap();
        assert_eq!(id, 4);

        let got = store.get(id).await.unwrap().unwrap();
        assert_eq!(got.title, "T");
        assert_eq!(got.author.as_deref(), Some("A"));
        assert_eq!(got.summary.as_deref(), Some("s"));
        assert!(!got.created_at.is_empty());

        assert!(store.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = seeded().await;
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_search_by_field() {
        let (_dir, store) = seeded().await;

        let all = store.search("rust", SearchField::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_author = store.search("Jane", SearchField::Author).await.unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].title, "Budget vote");

        let by_summary = store.search("traits", SearchField::Summary).await.unwrap();
        assert_eq!(by_summary.len(), 1);

        assert!(store.search("zzz", SearchField::Title).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_info() {
        let (_dir, store) = seeded().await;
        let info = store.table_info().await.unwrap();
        assert_eq!(info.total_rows, 3);
        let names: Vec<&str> = info.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "title", "author", "content", "summary", "source_url", "created_at"]
        );
        let title = info.columns.iter().find(|c| c.name == "title").unwrap();
        assert_eq!(title.kind, "TEXT");
        assert!(!title.nullable);
        assert!(info.columns.iter().find(|c| c.name == "author").unwrap().nullable);
    }

    #[tokio::test]
    async fn test_analysis() {
        let (_dir, store) = seeded().await;
        let analysis = store.analysis().await.unwrap();

        assert_eq!(analysis.content_stats.total_articles, 3);
        assert_eq!(analysis.content_stats.min_length, Some(17));
        assert_eq!(analysis.content_stats.max_length, Some(27));

        // The empty summary is excluded.
        assert_eq!(analysis.summary_stats.total_summaries, 2);
        assert_eq!(analysis.summary_stats.min_summary_length, Some(12));

        assert_eq!(analysis.source_distribution[0].source_url, "https://blog.rust-lang.org/a");
        assert_eq!(analysis.source_distribution[0].count, 2);

        assert_eq!(analysis.author_distribution[0].author, "Ferris");
        assert_eq!(analysis.author_distribution[0].count, 2);

        assert_eq!(analysis.timeline.len(), 1);
        assert_eq!(analysis.timeline[0].articles_count, 3);
    }

    #[tokio::test]
    async fn test_analysis_of_empty_table() {
        let dir = tempdir().unwrap();
        let store = ArticleStore::open(dir.path().join("empty.db")).await.unwrap();
        let analysis = store.analysis().await.unwrap();
        assert_eq!(analysis.content_stats.total_articles, 0);
        assert_eq!(analysis.content_stats.avg_length, None);
        assert_eq!(analysis.summary_stats.total_summaries, 0);
        assert!(analysis.source_distribution.is_empty());
        assert!(analysis.timeline.is_empty());
    }
}

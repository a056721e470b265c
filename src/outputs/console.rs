//! Plain-text views printed by the CLI commands.
//!
//! Every function here is pure: it takes query results and returns the text
//! to print, so the layouts can be tested without a terminal.

use crate::models::{ExtractedRecord, SearchField, StoredArticle, UNKNOWN_AUTHOR};
use crate::utils::{char_len, preview};

const RULE_WIDTH: usize = 80;
const CONTENT_PREVIEW_CHARS: usize = 500;
const SUMMARY_PREVIEW_CHARS: usize = 150;
const TEST_PREVIEW_CHARS: usize = 200;
const SNIPPET_BEFORE: usize = 50;
const SNIPPET_AFTER: usize = 100;

fn author_or_unknown(article: &StoredArticle) -> &str {
    article
        .author
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Output of `scrape`.
pub fn scrape_outcome(ids: &[i64]) -> String {
    let mut lines = vec![
        format!("Successfully processed {} articles", ids.len()),
        format!("Article IDs: {ids:?}"),
    ];
    if ids.is_empty() {
        lines.push("No articles were successfully processed. Check the logs for details.".into());
    }
    lines.join("\n")
}

/// Output of a successful `test-scrape`.
pub fn test_scrape(url: &str, record: &ExtractedRecord) -> String {
    [
        format!("\n✅ Successfully scraped: {url}"),
        format!("Title: {}", record.title),
        format!("Author: {}", record.author),
        format!("Content length: {} characters", char_len(&record.content)),
        format!("Content preview: {}", preview(&record.content, TEST_PREVIEW_CHARS)),
    ]
    .join("\n")
}

/// Output of `get-summary`.
pub fn summary(article: &StoredArticle) -> String {
    [
        format!("\nTitle: {}", article.title),
        format!("Author: {}", author_or_unknown(article)),
        format!("URL: {}", article.source_url),
        format!("Created: {}", article.created_at),
        format!(
            "\nSummary:\n{}",
            article.summary.as_deref().unwrap_or_default()
        ),
    ]
    .join("\n")
}

/// Output of `list-articles`.
pub fn article_list(articles: &[StoredArticle]) -> String {
    if articles.is_empty() {
        return "No articles found".to_string();
    }
    let mut lines = vec![format!("\nFound {} articles:\n", articles.len())];
    for article in articles {
        lines.push(format!("ID: {}", article.id));
        lines.push(format!("Title: {}", article.title));
        lines.push(format!("Author: {}", author_or_unknown(article)));
        lines.push(format!("Created: {}", article.created_at));
        lines.push("-".repeat(50));
    }
    lines.join("\n")
}

/// Output of `view-db`. `articles` is already cut to the requested limit.
pub fn database_view(articles: &[StoredArticle], full: bool) -> String {
    if articles.is_empty() {
        return "No articles found in database".to_string();
    }

    let total = articles.len();
    let mut lines = vec![
        format!("\n📊 Database Contents ({total} articles shown)"),
        "=".repeat(RULE_WIDTH),
    ];

    for (i, article) in articles.iter().enumerate() {
        lines.push(format!("\n🔹 Article #{} ({}/{total})", article.id, i + 1));
        lines.push(format!("Title: {}", article.title));
        lines.push(format!("Author: {}", author_or_unknown(article)));
        lines.push(format!("Source: {}", article.source_url));
        lines.push(format!("Created: {}", article.created_at));

        let summary = article.summary.as_deref().filter(|s| !s.is_empty());
        if full {
            lines.push("\n📝 Content:".to_string());
            lines.push(preview(&article.content, CONTENT_PREVIEW_CHARS));
            lines.push("\n📋 Summary:".to_string());
            lines.push(summary.unwrap_or("No summary available").to_string());
        } else {
            let summary = summary
                .map(|s| preview(s, SUMMARY_PREVIEW_CHARS))
                .unwrap_or_else(|| "No summary".to_string());
            lines.push(format!("Summary: {summary}"));
        }
        lines.push("-".repeat(RULE_WIDTH));
    }
    lines.join("\n")
}

/// Up to 50 characters before and 100 after the first case-insensitive match.
fn snippet(content: &str, query: &str) -> Option<String> {
    let haystack: Vec<char> = content.chars().collect();
    let needle: Vec<char> = query.to_lowercase().chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let lowered: Vec<char> = haystack
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let index = lowered.windows(needle.len()).position(|w| w == needle.as_slice())?;

    let start = index.saturating_sub(SNIPPET_BEFORE);
    let end = (index + SNIPPET_AFTER).min(haystack.len());
    Some(haystack[start..end].iter().collect())
}

/// Output of `search`.
pub fn search_results(query: &str, field: SearchField, results: &[StoredArticle]) -> String {
    if results.is_empty() {
        return format!("No articles found matching '{query}' in {field}");
    }

    let mut lines = vec![
        format!(
            "\n🔍 Search Results for '{query}' in {field} ({} found)",
            results.len()
        ),
        "=".repeat(RULE_WIDTH),
    ];
    let query_lower = query.to_lowercase();

    for article in results {
        lines.push(format!("\n#{} | {}", article.id, article.title));
        lines.push(format!("Author: {}", author_or_unknown(article)));
        lines.push(format!("Created: {}", article.created_at));

        if matches!(field, SearchField::All | SearchField::Content) {
            if let Some(snippet) = snippet(&article.content, query) {
                lines.push(format!("Content snippet: ...{snippet}..."));
            }
        }
        if matches!(field, SearchField::All | SearchField::Summary) {
            if let Some(summary) = article
                .summary
                .as_deref()
                .filter(|s| s.to_lowercase().contains(&query_lower))
            {
                lines.push(format!("Summary: {summary}"));
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i64, summary: Option<&str>) -> StoredArticle {
        StoredArticle {
            id,
            title: format!("Title {id}"),
            author: None,
            content: "the quick brown fox jumps over the lazy dog".to_string(),
            summary: summary.map(str::to_string),
            source_url: "https://example.com/a".to_string(),
            created_at: "2025-01-02 03:04:05".to_string(),
        }
    }

    #[test]
    fn test_scrape_outcome() {
        assert_eq!(
            scrape_outcome(&[1, 2]),
            "Successfully processed 2 articles\nArticle IDs: [1, 2]"
        );
        let empty = scrape_outcome(&[]);
        assert!(empty.starts_with("Successfully processed 0 articles\nArticle IDs: []"));
        assert!(empty.ends_with("No articles were successfully processed. Check the logs for details."));
    }

    #[test]
    fn test_test_scrape_preview() {
        let record = ExtractedRecord {
            title: "T".into(),
            author: "A".into(),
            content: "x".repeat(250),
            source_url: "https://e.com".into(),
        };
        let out = test_scrape("https://e.com", &record);
        assert!(out.contains("Content length: 250 characters"));
        assert!(out.contains(&format!("Content preview: {}...", "x".repeat(200))));
    }

    #[test]
    fn test_summary_and_list() {
        let article = stored(7, Some("Short summary."));
        let out = summary(&article);
        assert!(out.contains("Author: Unknown"));
        assert!(out.ends_with("Summary:\nShort summary."));

        assert_eq!(article_list(&[]), "No articles found");
        assert!(article_list(&[article]).contains("Found 1 articles:"));
    }

    #[test]
    fn test_database_view_modes() {
        let long_summary = "s".repeat(200);
        let articles = vec![stored(2, Some(&long_summary)), stored(1, None)];

        let brief = database_view(&articles, false);
        assert!(brief.contains("(2 articles shown)"));
        assert!(brief.contains("(1/2)"));
        assert!(brief.contains(&format!("Summary: {}...", "s".repeat(150))));
        assert!(brief.contains("Summary: No summary"));

        let full = database_view(&articles, true);
        assert!(full.contains("📝 Content:"));
        assert!(full.contains(&long_summary));
        assert!(full.contains("No summary available"));

        assert_eq!(database_view(&[], true), "No articles found in database");
    }

    #[test]
    fn test_snippet_window() {
        let content = format!("{}NEEDLE{}", "a".repeat(80), "b".repeat(200));
        let s = snippet(&content, "needle").unwrap();
        assert_eq!(s.chars().count(), 150);
        assert!(s.starts_with(&"a".repeat(50)));
        assert!(snippet("abc", "zzz").is_none());
        assert!(snippet("abc", "").is_none());
    }

    #[test]
    fn test_search_results() {
        let results = vec![stored(3, Some("A fox summary"))];
        let out = search_results("fox", SearchField::All, &results);
        assert!(out.contains("Search Results for 'fox' in all (1 found)"));
        assert!(out.contains("Content snippet: ...the quick brown fox"));
        assert!(out.contains("Summary: A fox summary"));

        let title_only = search_results("fox", SearchField::Title, &results);
        assert!(!title_only.contains("Content snippet"));

        assert_eq!(
            search_results("zzz", SearchField::Author, &[]),
            "No articles found matching 'zzz' in author"
        );
    }
}

//! Text statistics report for the `report` command.

use crate::errors::StoreError;
use crate::models::{ContentAnalysis, TableInfo, source_domain};
use crate::store::ArticleStore;
use chrono::{DateTime, Local};
use std::path::Path;

const WIDE_RULE: usize = 60;
const NARROW_RULE: usize = 30;
const TOP_N: usize = 10;
const RECENT_DAYS: usize = 7;

fn section(lines: &mut Vec<String>, heading: &str) {
    lines.push(heading.to_string());
    lines.push("-".repeat(NARROW_RULE));
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}

/// Render the report.
///
/// Coverage is reported as 0.0% for an empty database.
pub fn render(
    db_path: &Path,
    table_info: &TableInfo,
    analysis: &ContentAnalysis,
    generated: DateTime<Local>,
) -> String {
    let mut lines = vec![
        "=".repeat(WIDE_RULE),
        "ARTICLE DATABASE ANALYSIS REPORT".to_string(),
        "=".repeat(WIDE_RULE),
        format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
        format!("Database: {}", db_path.display()),
        String::new(),
    ];

    let summaries = &analysis.summary_stats;
    let coverage = if table_info.total_rows > 0 {
        summaries.total_summaries as f64 / table_info.total_rows as f64 * 100.0
    } else {
        0.0
    };
    section(&mut lines, "📊 BASIC STATISTICS");
    lines.push(format!("Total Articles: {}", table_info.total_rows));
    lines.push(format!("Total Summaries: {}", summaries.total_summaries));
    lines.push(format!("Summary Coverage: {coverage:.1}%"));
    lines.push(String::new());

    let content = &analysis.content_stats;
    section(&mut lines, "📝 CONTENT ANALYSIS");
    lines.push(format!(
        "Average Content Length: {} characters",
        or_na(content.avg_length.map(|a| format!("{a:.0}")))
    ));
    lines.push(format!("Shortest Article: {} characters", or_na(content.min_length)));
    lines.push(format!("Longest Article: {} characters", or_na(content.max_length)));
    lines.push(String::new());

    if summaries.total_summaries > 0 {
        section(&mut lines, "📋 SUMMARY ANALYSIS");
        lines.push(format!(
            "Average Summary Length: {} characters",
            or_na(summaries.avg_summary_length.map(|a| format!("{a:.0}")))
        ));
        lines.push(format!(
            "Shortest Summary: {} characters",
            or_na(summaries.min_summary_length)
        ));
        lines.push(format!(
            "Longest Summary: {} characters",
            or_na(summaries.max_summary_length)
        ));
        lines.push(String::new());
    }

    section(&mut lines, "🌐 SOURCE DISTRIBUTION");
    for source in analysis.source_distribution.iter().take(TOP_N) {
        lines.push(format!(
            "{}: {} articles",
            source_domain(&source.source_url),
            source.count
        ));
    }
    lines.push(String::new());

    if !analysis.author_distribution.is_empty() {
        section(&mut lines, "✍️  TOP AUTHORS");
        for author in analysis.author_distribution.iter().take(TOP_N) {
            lines.push(format!("{}: {} articles", author.author, author.count));
        }
        lines.push(String::new());
    }

    section(&mut lines, "📅 RECENT ACTIVITY");
    for day in analysis.timeline.iter().take(RECENT_DAYS) {
        lines.push(format!("{}: {} articles", day.date, day.articles_count));
    }
    lines.push(String::new());
    lines.push("=".repeat(WIDE_RULE));

    lines.join("\n")
}

/// Gather statistics from `store` and render the report for its database file.
pub async fn build(store: &ArticleStore, generated: DateTime<Local>) -> Result<String, StoreError> {
    let table_info = store.table_info().await?;
    let analysis = store.analysis().await?;
    Ok(render(store.path(), &table_info, &analysis, generated))
}

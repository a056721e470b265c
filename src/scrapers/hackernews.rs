//! Hacker News stories via the public Firebase API.
//!
//! # Flow
//!
//! 1. `GET {api}/topstories.json` for the ranked story IDs
//! 2. `GET {api}/item/{id}.json` for each of the first `limit` IDs
//! 3. Stories that only carry a link get one extraction pass over that link;
//!    the first 1000 characters of it become the content
//!
//! Self-post text is capped at [`MAX_CONTENT_CHARS`] like extracted pages.
//!
//! Items are fetched one at a time with a short pause in between to stay
//! well inside the API's rate limits.

use super::web::scrape_url;
use crate::extractor::content::MAX_CONTENT_CHARS;
use crate::fetcher::Fetcher;
use crate::models::{ExtractedRecord, UNKNOWN_AUTHOR};
use crate::utils::truncate_chars;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

pub const HACKERNEWS_API: &str = "https://hacker-news.firebaseio.com/v0";
/// Pause after every item request.
pub const ITEM_DELAY: Duration = Duration::from_millis(100);
/// Characters kept from a linked page.
pub const LINKED_CONTENT_CHARS: usize = 1000;

/// The fields of an HN item this adapter cares about.
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    text: Option<String>,
    url: Option<String>,
    by: Option<String>,
}

/// Discussion page for a story.
pub fn item_url(id: u64) -> String {
    format!("https://news.ycombinator.com/item?id={id}")
}

async fn get_json<T: for<'de> Deserialize<'de>>(
    fetcher: &Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    let resp = fetcher
        .client()
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json::<T>().await?)
}

async fn fetch_story(
    fetcher: &Fetcher,
    api: &str,
    id: u64,
    timeout: Duration,
) -> Result<Option<ExtractedRecord>, Box<dyn Error + Send + Sync>> {
    // Deleted items come back as JSON `null`.
    let item: Option<Item> = get_json(fetcher, &format!("{api}/item/{id}.json"), timeout).await?;
    let Some(item) = item else {
        return Ok(None);
    };
    let Some(title) = item.title.filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };

    let text = item.text.filter(|t| !t.trim().is_empty());
    let mut content = match text.as_deref() {
        Some(text) => truncate_chars(text, MAX_CONTENT_CHARS).to_string(),
        None => title.clone(),
    };

    if let (Some(link), None) = (item.url.as_deref(), text.as_ref()) {
        match scrape_url(fetcher, link, timeout).await {
            Ok(linked) => {
                content = format!(
                    "{}...",
                    truncate_chars(&linked.content, LINKED_CONTENT_CHARS)
                );
            }
            Err(e) => debug!(id, %link, error = %e, "Could not scrape linked story"),
        }
    }

    Ok(Some(ExtractedRecord {
        title,
        author: item.by.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        content,
        source_url: item_url(id),
    }))
}

/// Fetch the top `limit` stories.
///
/// # Returns
///
/// The stories that could be fetched; empty if the ID list itself failed.
#[instrument(level = "info", skip(fetcher, timeout))]
pub async fn fetch_stories(
    fetcher: &Fetcher,
    api: &str,
    limit: usize,
    timeout: Duration,
) -> Vec<ExtractedRecord> {
    let ids: Vec<u64> = match get_json(fetcher, &format!("{api}/topstories.json"), timeout).await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "Hacker News story list request failed");
            return Vec::new();
        }
    };

    let mut stories = Vec::new();
    for id in ids.into_iter().take(limit) {
        match fetch_story(fetcher, api, id, timeout).await {
            Ok(Some(story)) => stories.push(story),
            Ok(None) => debug!(id, "Skipping item without a title"),
            Err(e) => debug!(id, error = %e, "Error processing Hacker News item"),
        }
        sleep(ITEM_DELAY).await;
    }

    info!(count = stories.len(), "Scraped stories from Hacker News");
    stories
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_json(server: &MockServer, p: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_stories_builds_records() {
        let server = MockServer::start().await;
        let linked = format!(
            "<html><body><h1>Linked</h1><article>{}</article></body></html>",
            "Linked article prose goes on and on. ".repeat(60)
        );
        Mock::given(method("GET"))
            .and(path("/linked"))
            .respond_with(ResponseTemplate::new(200).set_body_string(linked))
            .mount(&server)
            .await;

        mount_json(&server, "/topstories.json", json!([1, 2, 3, 4, 5])).await;
        mount_json(
            &server,
            "/item/1.json",
            json!({"id": 1, "title": "Ask HN: Anything?", "text": "Body text", "by": "pg"}),
        )
        .await;
        mount_json(
            &server,
            "/item/2.json",
            json!({"id": 2, "title": "Show HN: Link", "url": format!("{}/linked", server.uri())}),
        )
        .await;
        mount_json(&server, "/item/3.json", json!({"id": 3, "by": "nobody"})).await;
        mount_json(&server, "/item/4.json", json!(null)).await;
        // item 5 is not mounted and 404s

        let fetcher = Fetcher::new().unwrap();
        let stories = fetch_stories(&fetcher, &server.uri(), 10, Duration::from_secs(5)).await;

        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "Ask HN: Anything?");
        assert_eq!(stories[0].author, "pg");
        assert_eq!(stories[0].content, "Body text");
        assert_eq!(stories[0].source_url, "https://news.ycombinator.com/item?id=1");

        assert_eq!(stories[1].author, UNKNOWN_AUTHOR);
        assert!(stories[1].content.starts_with("Linked article prose"));
        assert!(stories[1].content.ends_with("..."));
        assert_eq!(stories[1].content.chars().count(), LINKED_CONTENT_CHARS + 3);
    }

    #[tokio::test]
    async fn test_long_text_is_capped() {
        let server = MockServer::start().await;
        mount_json(&server, "/topstories.json", json!([7])).await;
        mount_json(
            &server,
            "/item/7.json",
            json!({"id": 7, "title": "Ask HN: long", "text": "é".repeat(15_000), "by": "pg"}),
        )
        .await;

        let fetcher = Fetcher::new().unwrap();
        let stories = fetch_stories(&fetcher, &server.uri(), 1, Duration::from_secs(5)).await;
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].content.chars().count(), MAX_CONTENT_CHARS);
    }

    #[tokio::test]
    async fn test_respects_limit() {
        let server = MockServer::start().await;
        mount_json(&server, "/topstories.json", json!([10, 11, 12])).await;
        for id in [10, 11, 12] {
            mount_json(
                &server,
                &format!("/item/{id}.json"),
                json!({"id": id, "title": format!("Story {id}"), "text": "t"}),
            )
            .await;
        }

        let fetcher = Fetcher::new().unwrap();
        let stories = fetch_stories(&fetcher, &server.uri(), 2, Duration::from_secs(5)).await;
        let titles: Vec<_> = stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 10", "Story 11"]);
    }

    #[tokio::test]
    async fn test_failed_story_list_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let stories = fetch_stories(&fetcher, &server.uri(), 5, Duration::from_secs(5)).await;
        assert!(stories.is_empty());
    }
}

//! Reddit hot listings from the public `hot.json` endpoint.
//!
//! Records are built from the listing's JSON fields; no linked page is
//! fetched. Link posts with no self text keep a short placeholder as their
//! content so they still land in the store. Self text is capped at
//! [`MAX_CONTENT_CHARS`] like extracted pages.
//!
//! `limit` bounds the listing entries examined, so skipped posts count
//! against it.

use crate::extractor::content::MAX_CONTENT_CHARS;
use crate::fetcher::Fetcher;
use crate::models::ExtractedRecord;
use crate::utils::truncate_chars;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, instrument};

pub const REDDIT_BASE: &str = "https://www.reddit.com";
/// Used for `reddit:` with nothing after the colon.
pub const DEFAULT_SUBREDDIT: &str = "news";
/// Reddit rejects requests carrying a browser user agent without cookies.
pub const REDDIT_USER_AGENT: &str = "NewsBot 1.0";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    is_self: bool,
}

impl Post {
    /// Self posts with no body carry nothing worth storing.
    fn into_record(self) -> Option<ExtractedRecord> {
        if self.title.trim().is_empty() {
            return None;
        }
        let body = self.selftext.trim();
        if self.is_self && body.is_empty() {
            return None;
        }
        let content = if body.is_empty() {
            format!("Reddit post: {}", self.title)
        } else {
            truncate_chars(&self.selftext, MAX_CONTENT_CHARS).to_string()
        };
        Some(ExtractedRecord {
            title: self.title,
            author: format!("u/{}", self.author),
            content,
            source_url: format!("https://reddit.com{}", self.permalink),
        })
    }
}

/// Listing URL for `subreddit`.
pub fn listing_url(base: &str, subreddit: &str, limit: usize) -> String {
    format!(
        "{}/r/{}/hot.json?limit={limit}",
        base.trim_end_matches('/'),
        urlencoding::encode(subreddit)
    )
}

async fn fetch_listing(
    fetcher: &Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<Listing, Box<dyn Error + Send + Sync>> {
    let resp = fetcher
        .client()
        .get(url)
        .header(USER_AGENT, REDDIT_USER_AGENT)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json::<Listing>().await?)
}

/// Fetch up to `limit` hot posts from `subreddit`.
///
/// # Returns
///
/// The posts that produced a record; empty on any request or decode error.
#[instrument(level = "info", skip(fetcher, timeout))]
pub async fn fetch_posts(
    fetcher: &Fetcher,
    base: &str,
    subreddit: &str,
    limit: usize,
    timeout: Duration,
) -> Vec<ExtractedRecord> {
    let url = listing_url(base, subreddit, limit);
    let listing = match fetch_listing(fetcher, &url, timeout).await {
        Ok(listing) => listing,
        Err(e) => {
            error!(%url, error = %e, "Reddit listing request failed");
            return Vec::new();
        }
    };

    let posts: Vec<ExtractedRecord> = listing
        .data
        .children
        .into_iter()
        .take(limit)
        .filter_map(|child| child.data.into_record())
        .collect();

    info!(count = posts.len(), %subreddit, "Scraped posts from Reddit");
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_listing_url_encodes_subreddit() {
        assert_eq!(
            listing_url("https://www.reddit.com/", "rust", 5),
            "https://www.reddit.com/r/rust/hot.json?limit=5"
        );
        assert_eq!(
            listing_url("http://x", "a b", 1),
            "http://x/r/a%20b/hot.json?limit=1"
        );
    }

    #[tokio::test]
    async fn test_fetch_posts_maps_fields() {
        let server = MockServer::start().await;
        let body = json!({
            "data": {
                "children": [
                    {"data": {"title": "Self post", "selftext": "Some words", "author": "alice",
                              "permalink": "/r/rust/comments/1/self_post/", "is_self": true}},
                    {"data": {"title": "Empty self", "selftext": "", "author": "bob",
                              "permalink": "/r/rust/comments/2/", "is_self": true}},
                    {"data": {"title": "Link post", "selftext": "", "author": "carol",
                              "permalink": "/r/rust/comments/3/link/", "is_self": false}}
                ]
            }
        });
        Mock::given(method("GET"))
            .and(path("/r/rust/hot.json"))
            .and(query_param("limit", "10"))
            .and(header("user-agent", REDDIT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let posts = fetch_posts(&fetcher, &server.uri(), "rust", 10, Duration::from_secs(5)).await;

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Self post");
        assert_eq!(posts[0].author, "u/alice");
        assert_eq!(posts[0].content, "Some words");
        assert_eq!(
            posts[0].source_url,
            "https://reddit.com/r/rust/comments/1/self_post/"
        );
        assert_eq!(posts[1].content, "Reddit post: Link post");
        assert_eq!(posts[1].author, "u/carol");
    }

    async fn mount_listing(server: &MockServer, subreddit: &str, children: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/r/{subreddit}/hot.json")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"children": children}})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_limit_counts_skipped_posts() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "news",
            json!([
                {"data": {"title": "Empty self", "selftext": "", "author": "a",
                          "permalink": "/r/news/comments/1/", "is_self": true}},
                {"data": {"title": "Big", "selftext": "Big story", "author": "b",
                          "permalink": "/r/news/comments/2/", "is_self": true}},
                {"data": {"title": "Third", "selftext": "More", "author": "c",
                          "permalink": "/r/news/comments/3/", "is_self": true}}
            ]),
        )
        .await;

        let fetcher = Fetcher::new().unwrap();
        let posts = fetch_posts(&fetcher, &server.uri(), "news", 2, Duration::from_secs(5)).await;
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Big"]);
    }

    #[tokio::test]
    async fn test_long_selftext_is_capped() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "rust",
            json!([
                {"data": {"title": "Essay", "selftext": "ü".repeat(15_000), "author": "d",
                          "permalink": "/r/rust/comments/4/", "is_self": true}}
            ]),
        )
        .await;

        let fetcher = Fetcher::new().unwrap();
        let posts = fetch_posts(&fetcher, &server.uri(), "rust", 5, Duration::from_secs(5)).await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content.chars().count(), MAX_CONTENT_CHARS);
    }

    #[tokio::test]
    async fn test_error_status_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let posts = fetch_posts(&fetcher, &server.uri(), "news", 5, Duration::from_secs(5)).await;
        assert!(posts.is_empty());
    }
}

//! HTTP fetching with browser-like headers.
//!
//! Many sites refuse requests from clients that do not look like a desktop
//! browser, so every request carries a fixed Chrome-on-Windows header set.
//! A fetch never retries and never panics: any failure comes back as a
//! [`FetchError`] after being logged.

use crate::errors::FetchError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// User-Agent string presented to every site.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A successfully downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested, after scheme normalization.
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Outcome of a single fetch attempt.
pub type FetchResult = Result<FetchedPage, FetchError>;

/// Prepend `https://` when `url` has no `http(s)` scheme.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com/a"), "https://example.com/a");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// The browser-like default headers.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers
}

/// Thin wrapper over a shared `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher whose client sends [`browser_headers`] by default.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .build()?;
        Ok(Self { client })
    }

    /// The underlying client, for adapters that talk to JSON APIs.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET `url` and return its body, or a typed failure.
    ///
    /// Any status other than `200 OK` is a failure.
    #[instrument(level = "info", skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult {
        let url = normalize_url(url);

        let response = match self.client.get(&url).timeout(timeout).send().await {
            Ok(r) => r,
            Err(e) => {
                let err = FetchError::from_reqwest(&url, e);
                error!(error = %err, "Fetch failed");
                return Err(err);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), %url, "Non-200 response");
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        match response.text().await {
            Ok(body) => {
                debug!(bytes = body.len(), "Fetched page");
                Ok(FetchedPage {
                    url,
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => {
                let err = FetchError::from_reqwest(&url, e);
                error!(error = %err, "Failed reading response body");
                Err(err)
            }
        }
    }
}

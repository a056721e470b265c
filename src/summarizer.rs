//! LLM summarization with caller-owned rate limiting.
//!
//! # Architecture
//!
//! - [`Summarize`]: core trait for "text in, short summary out"
//! - [`GeminiSummarizer`]: Google Gemini `generateContent` client
//! - [`RateLimited`]: decorator that spaces calls to any [`Summarize`] at least
//!   one interval apart
//! - [`summarize_or_placeholder`]: the pipeline entry point; never fails
//!
//! # Rate Limiting
//!
//! The time of the last completed request lives inside the [`RateLimited`]
//! value behind an async mutex. The lock is held for the whole wait + call,
//! so concurrent callers queue up and still see one request per interval.

use crate::errors::SummarizeError;
use crate::utils::{char_len, truncate_chars, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, instrument, warn};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Input beyond this many characters is cut before submission.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 8_000;
/// Summaries are trimmed to this many sentences.
pub const MAX_SUMMARY_SENTENCES: usize = 4;

pub const NO_SUMMARY: &str = "No summary available";
pub const EMPTY_SUMMARY: &str = "Summary could not be generated.";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Something that can turn article text into a short summary.
pub trait Summarize {
    /// Summarize `text`.
    ///
    /// # Returns
    ///
    /// The raw model output, or an error if the request failed.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Prompt sent ahead of the article text.
fn summary_prompt(text: &str) -> String {
    format!(
        "Please provide a concise summary of the following text in exactly 3-4 sentences. \
         Focus on the main points, key information, and essential details. \
         Make it informative and well-structured:\n\n{text}"
    )
}

/// Google Gemini client for the `generateContent` endpoint.
pub struct GeminiSummarizer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSummarizer")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiSummarizer {
    /// Create a client for `model` using `api_key`.
    ///
    /// # Errors
    ///
    /// [`SummarizeError::MissingApiKey`] for a blank key.
    pub fn new(api_key: &str, model: &str) -> Result<Self, SummarizeError> {
        if api_key.trim().is_empty() {
            return Err(SummarizeError::MissingApiKey);
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl Summarize for GeminiSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: summary_prompt(text),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                response_mime_type: "text/plain",
            },
        };

        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body = %truncate_for_log(&body, 300),
                "Gemini API error"
            );
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, chars = char_len(&text), "Gemini responded");
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Decorator that keeps calls to `inner` at least `interval` apart.
pub struct RateLimited<S> {
    inner: S,
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl<S> RateLimited<S> {
    pub fn new(inner: S, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_request: Mutex::new(None),
        }
    }
}

impl<S> fmt::Debug for RateLimited<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimited")
            .field("interval", &self.interval)
            .finish()
    }
}

impl<S: Summarize> Summarize for RateLimited<S> {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let since = prev.elapsed();
            if since < self.interval {
                let wait = self.interval - since;
                debug!(?wait, "Rate limiting summarization request");
                sleep(wait).await;
            }
        }
        let result = self.inner.summarize(text).await;
        *last = Some(Instant::now());
        result
    }
}

/// Cap `text` at `max_chars` characters, marking the cut with `"..."`.
pub fn prepare_input(text: &str, max_chars: usize) -> String {
    if char_len(text) > max_chars {
        format!("{}...", truncate_chars(text, max_chars))
    } else {
        text.to_string()
    }
}

/// Tidy raw model output and keep at most `max_sentences` sentences.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(postprocess_summary("One.  Two!\nThree?", 2), "One. Two.");
/// ```
pub fn postprocess_summary(summary: &str, max_sentences: usize) -> String {
    if summary.is_empty() {
        return String::new();
    }
    let summary = WHITESPACE_RE.replace_all(summary, " ");
    let summary = summary.trim();

    let sentences: Vec<&str> = SENTENCE_END_RE
        .split(summary)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(max_sentences)
        .collect();

    if sentences.is_empty() {
        summary.to_string()
    } else {
        format!("{}.", sentences.join(". "))
    }
}

/// Summarize `text`, degrading every failure to a placeholder string.
///
/// With no summarizer configured the placeholder is [`NO_SUMMARY`].
#[instrument(level = "info", skip_all, fields(chars = char_len(text)))]
pub async fn summarize_or_placeholder<S: Summarize>(
    summarizer: Option<&S>,
    text: &str,
    max_input_chars: usize,
) -> String {
    let Some(summarizer) = summarizer else {
        return NO_SUMMARY.to_string();
    };
    if text.is_empty() {
        return NO_SUMMARY.to_string();
    }

    match summarizer.summarize(&prepare_input(text, max_input_chars)).await {
        Ok(raw) if !raw.trim().is_empty() => {
            info!("Summary generated");
            postprocess_summary(raw.trim(), MAX_SUMMARY_SENTENCES)
        }
        Ok(_) | Err(SummarizeError::EmptyResponse) => {
            warn!("Empty response from summarization API");
            EMPTY_SUMMARY.to_string()
        }
        Err(e) => {
            error!(error = %e, "Summarization failed");
            format!("Error generating summary: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Echo {
        calls: AtomicUsize,
    }

    impl Summarize for Echo {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }
    }

    struct Failing;

    impl Summarize for Failing {
        async fn summarize(&self, _text: &str) -> Result<String, SummarizeError> {
            Err(SummarizeError::Api {
                status: 500,
                body: "internal".to_string(),
            })
        }
    }

    #[test]
    fn test_postprocess_limits_sentences() {
        let raw = "First point.   Second point!\n\nThird point? Fourth. Fifth.";
        assert_eq!(
            postprocess_summary(raw, 4),
            "First point. Second point. Third point. Fourth."
        );
        assert_eq!(postprocess_summary("One.  Two!\nThree?", 2), "One. Two.");
        assert_eq!(postprocess_summary("", 4), "");
        assert_eq!(postprocess_summary("No terminal punctuation", 4), "No terminal punctuation.");
    }

    #[test]
    fn test_prepare_input_caps_length() {
        assert_eq!(prepare_input("short", 10), "short");
        let long = "é".repeat(20);
        let prepared = prepare_input(&long, 8);
        assert_eq!(prepared, format!("{}...", "é".repeat(8)));
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(matches!(
            GeminiSummarizer::new("  ", DEFAULT_MODEL),
            Err(SummarizeError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_placeholders() {
        let none: Option<&Echo> = None;
        assert_eq!(summarize_or_placeholder(none, "text", 100).await, NO_SUMMARY);

        let failing = Failing;
        let got = summarize_or_placeholder(Some(&failing), "text", 100).await;
        assert!(got.starts_with("Error generating summary:"));

        let echo = Echo {
            calls: AtomicUsize::new(0),
        };
        assert_eq!(
            summarize_or_placeholder(Some(&echo), "   ", 100).await,
            EMPTY_SUMMARY
        );
    }

    #[tokio::test]
    async fn test_rate_limited_spaces_calls() {
        let limited = RateLimited::new(
            Echo {
                calls: AtomicUsize::new(0),
            },
            Duration::from_millis(150),
        );
        let start = std::time::Instant::now();
        limited.summarize("a").await.unwrap();
        limited.summarize("b").await.unwrap();
        limited.summarize("c").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(limited.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gemini_summarize_against_mock() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:generateContent"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "The council approved the budget. " },
                        { "text": "Taxes stay flat." }
                    ]}
                }]
            })))
            .mount(&server)
            .await;

        let gemini = GeminiSummarizer::new("secret", "test-model")
            .unwrap()
            .with_base_url(&server.uri());
        let summary = summarize_or_placeholder(Some(&gemini), "some article text", 8_000).await;
        assert_eq!(summary, "The council approved the budget. Taxes stay flat.");
    }

    #[tokio::test]
    async fn test_gemini_error_status_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let gemini = GeminiSummarizer::new("secret", "test-model")
            .unwrap()
            .with_base_url(&server.uri());
        let err = gemini.summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Api { status: 429, .. }));

        let summary = summarize_or_placeholder(Some(&gemini), "text", 8_000).await;
        assert!(summary.contains("429"));
    }

    #[tokio::test]
    async fn test_gemini_without_candidates_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
            .mount(&server)
            .await;

        let gemini = GeminiSummarizer::new("secret", "test-model")
            .unwrap()
            .with_base_url(&server.uri());
        assert!(matches!(
            gemini.summarize("text").await,
            Err(SummarizeError::EmptyResponse)
        ));
        assert_eq!(
            summarize_or_placeholder(Some(&gemini), "text", 8_000).await,
            EMPTY_SUMMARY
        );
    }
}

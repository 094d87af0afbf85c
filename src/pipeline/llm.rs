//! Generation-service client and the two-step per-page protocol.
//!
//! This module is the only stage with network I/O. The wire client
//! ([`GeminiClient`]) knows nothing about pages or prompts; all prompt
//! text lives in [`crate::prompts`] so it can change without touching
//! request or error handling here.
//!
//! ## The two-step protocol
//!
//! Each page is summarized with exactly two sequential generation calls:
//! first the model is asked to elaborate on and explain the page text,
//! then it is asked to clean that explanation into readable prose with
//! the first response supplied as context. Both responses are trimmed;
//! the second one is the summary.
//!
//! ## Retry Strategy
//!
//! Retries are off by default (a failed call becomes the page's error
//! immediately). When `max_retries > 0`, the whole two-call protocol is
//! retried with exponential backoff (`retry_backoff_ms * 2^attempt`), so
//! with a 500 ms base and 3 retries the wait sequence is 500 ms, 1 s, 2 s.

use crate::config::SummarizeConfig;
use crate::error::{PageError, SummarizeError};
use crate::output::PageSummary;
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Concatenated text of the first candidate, `None` when the response
/// carries no usable text.
fn response_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// A single generation call's failure.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Transport-level failure (connection, TLS, timeout, bad JSON body).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// HTTP 200 but no candidate text in the response.
    #[error("API response contained no generated text")]
    EmptyResponse,
}

impl GenerateError {
    fn is_timeout(&self) -> bool {
        matches!(self, GenerateError::Request(e) if e.is_timeout())
    }
}

// ── Client ───────────────────────────────────────────────────────────────

/// Minimal client for the `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from the run configuration.
    pub fn new(config: &SummarizeConfig) -> Result<Self, SummarizeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| SummarizeError::Internal(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The model identifier requests are issued against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one generation call and return the response text, trimmed.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("requesting generation for {} prompt chars", prompt.len());

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerateError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = response_text(parsed).ok_or(GenerateError::EmptyResponse)?;
        Ok(text.trim().to_string())
    }
}

// ── Per-page protocol ────────────────────────────────────────────────────

/// Summarize one page of text via the two-step protocol.
///
/// ## Return Value
///
/// Always returns a [`PageSummary`] — the error is captured inside it so a
/// single bad page never aborts the run. Callers check `result.error` to
/// decide whether to include the summary or render the failure.
pub async fn summarize_page(
    client: &GeminiClient,
    page_num: usize,
    text: &str,
    config: &SummarizeConfig,
) -> PageSummary {
    let start = Instant::now();
    let mut last_err: Option<GenerateError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "page {page_num}: retry {attempt}/{} after {backoff}ms",
                config.max_retries
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match run_protocol(client, text).await {
            Ok(summary) => {
                let duration = start.elapsed();
                debug!(
                    "page {page_num}: {} chars in, {} chars out, {:?}",
                    text.len(),
                    summary.len(),
                    duration
                );
                return PageSummary {
                    page_num,
                    summary,
                    chars_in: text.len(),
                    duration_ms: duration.as_millis() as u64,
                    retries: attempt as u8,
                    error: None,
                };
            }
            Err(e) => {
                warn!("page {page_num}: attempt {} failed: {e}", attempt + 1);
                last_err = Some(e);
            }
        }
    }

    let duration = start.elapsed();
    let error = match last_err {
        Some(e) if e.is_timeout() => PageError::Timeout {
            page: page_num,
            secs: config.api_timeout_secs,
        },
        Some(e) => PageError::SummaryFailed {
            page: page_num,
            detail: e.to_string(),
        },
        None => PageError::SummaryFailed {
            page: page_num,
            detail: "unknown error".to_string(),
        },
    };

    PageSummary {
        page_num,
        summary: String::new(),
        chars_in: text.len(),
        duration_ms: duration.as_millis() as u64,
        retries: config.max_retries as u8,
        error: Some(error),
    }
}

/// Both generation calls, in order. The second response is the summary.
async fn run_protocol(client: &GeminiClient, text: &str) -> Result<String, GenerateError> {
    let explanation = client.generate(&prompts::elaborate_prompt(text)).await?;
    client.generate(&prompts::cleanup_prompt(&explanation)).await
}

//! Streaming API: yield per-page results as each page completes.
//!
//! Large documents take a while (two generation calls per page, strictly
//! sequential). A stream lets callers display partial results immediately
//! instead of waiting for the whole run. Unlike the eager
//! [`crate::summarize::summarize`], the stream does not assemble a bundle
//! or persist an artifact; it hands each [`PageSummary`] to the caller as
//! soon as its page finishes, in document order.

use crate::config::SummarizeConfig;
use crate::error::{PageError, SummarizeError};
use crate::output::PageSummary;
use crate::pipeline::{extract, llm, polish};
use crate::summarize::effective_page_count;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of page results.
pub type PageStream = Pin<Box<dyn Stream<Item = Result<PageSummary, PageError>> + Send>>;

/// Summarize a PDF, streaming page results as they are ready.
///
/// Pages are emitted strictly in document order; blank pages are skipped
/// and never appear in the stream. A page whose summarization failed is
/// emitted as `Err(PageError)`.
///
/// # Errors
/// Returns `Err(SummarizeError)` only for fatal problems detected before
/// streaming starts (missing file, not a PDF).
pub async fn summarize_stream(
    input: impl AsRef<Path>,
    page_limit: Option<usize>,
    config: &SummarizeConfig,
) -> Result<PageStream, SummarizeError> {
    let path = input.as_ref();
    info!("starting streaming run: {}", path.display());

    let page_texts = extract::extract_page_texts(path).await?;
    let selected = effective_page_count(page_texts.len(), page_limit);

    let client = Arc::new(llm::GeminiClient::new(config)?);
    let cfg = config.clone();

    let items: Vec<(usize, String)> = page_texts
        .into_iter()
        .take(selected)
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| (idx + 1, text))
        .collect();

    let s = stream::iter(items).then(move |(page_num, text)| {
        let client = Arc::clone(&client);
        let cfg = cfg.clone();
        async move {
            let mut result = llm::summarize_page(&client, page_num, &text, &cfg).await;
            match result.error.take() {
                None => {
                    result.summary = polish::clean_summary(&result.summary);
                    Ok(result)
                }
                Some(err) => Err(err),
            }
        }
    });

    Ok(Box::pin(s))
}

//! Run entry point: the full extract → summarize → assemble → persist pass.
//!
//! The run is a single linear pass. The document is parsed once; pages are
//! then summarized strictly in increasing order, one at a time (each page
//! issues two sequential generation calls, and there is deliberately no
//! concurrency across pages). The assembled bundle is persisted as its own
//! artifact, named by a fresh run token, before the call returns.

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;
use crate::output::{PageSummary, RunOutput, RunStats};
use crate::pipeline::{extract, llm, polish};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Summarize a PDF document page by page.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — path to a local PDF file
/// * `page_limit` — summarize at most this many pages from the start of
///   the document; `None` means all pages, `Some(0)` means none
/// * `config` — run configuration
///
/// # Returns
/// `Ok(RunOutput)` on success, even if some pages failed (check
/// `output.stats.failed_pages`); the bundle artifact has been written when
/// this returns. A document with zero extractable pages produces an empty
/// bundle and a zero-byte artifact.
///
/// # Errors
/// Returns `Err(SummarizeError)` only for fatal problems: missing or
/// unreadable input, a file that is not a PDF, or an unwritable output
/// directory.
pub async fn summarize(
    input: impl AsRef<Path>,
    page_limit: Option<usize>,
    config: &SummarizeConfig,
) -> Result<RunOutput, SummarizeError> {
    let total_start = Instant::now();
    let path = input.as_ref();
    info!("starting summarization run: {}", path.display());

    // ── Step 1: Extract page texts (single parse pass) ───────────────────
    let extract_start = Instant::now();
    let page_texts = extract::extract_page_texts(path).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let total_pages = page_texts.len();
    info!("document has {total_pages} pages of extractable text");

    // ── Step 2: Apply the requested page limit ───────────────────────────
    let selected = effective_page_count(total_pages, page_limit);
    debug!("summarizing {selected} of {total_pages} pages");

    // ── Step 3: Summarize pages sequentially ─────────────────────────────
    let client = llm::GeminiClient::new(config)?;
    let llm_start = Instant::now();
    let mut pages: Vec<PageSummary> = Vec::with_capacity(selected);
    let mut skipped = 0usize;

    for (idx, text) in page_texts.iter().take(selected).enumerate() {
        let page_num = idx + 1;
        if text.trim().is_empty() {
            debug!("page {page_num}: no extractable text, skipped");
            skipped += 1;
            continue;
        }

        let mut page = llm::summarize_page(&client, page_num, text, config).await;
        if page.error.is_none() {
            page.summary = polish::clean_summary(&page.summary);
        }
        pages.push(page);
    }
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 4: Assemble and persist the bundle ──────────────────────────
    let text = assemble_bundle(&pages);
    let run_id = Uuid::new_v4().to_string();
    let output_path = write_bundle(&config.output_dir, &run_id, &text).await?;

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let failed = pages.iter().filter(|p| p.error.is_some()).count();
    let stats = RunStats {
        total_pages,
        selected_pages: selected,
        processed_pages: pages.len() - failed,
        skipped_pages: skipped,
        failed_pages: failed,
        extract_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "run {run_id} complete: {}/{} pages, {}ms total",
        stats.processed_pages, selected, stats.total_duration_ms
    );

    Ok(RunOutput {
        run_id,
        text,
        pages,
        stats,
        output_path,
    })
}

/// Number of pages to process given the document total and an optional
/// requested limit.
///
/// A limit of 0 is honored literally: zero pages, no generation calls.
pub fn effective_page_count(total: usize, limit: Option<usize>) -> usize {
    match limit {
        Some(n) => n.min(total),
        None => total,
    }
}

/// Render per-page results into the downloadable bundle text.
///
/// Every attempted page contributes one block:
/// `--- Page N ---\n{body}\n\n`, where `N` is the original document page
/// number and the body is either the summary or, for a failed page, an
/// `Error during summarization: <message>` line. Skipped (blank) pages
/// contribute nothing, so their numbers are absent.
pub fn assemble_bundle(pages: &[PageSummary]) -> String {
    let mut bundle = String::new();
    for page in pages {
        match &page.error {
            None => {
                let _ = write!(bundle, "--- Page {} ---\n{}\n\n", page.page_num, page.summary);
            }
            Some(err) => {
                let _ = write!(
                    bundle,
                    "--- Page {} ---\nError during summarization: {}\n\n",
                    page.page_num,
                    err.detail()
                );
            }
        }
    }
    bundle
}

/// Persist the bundle as `<output_dir>/summary-<run_id>.txt`.
///
/// Uses a temp-file-then-rename write so a crashed run never leaves a
/// half-written artifact behind.
pub(crate) async fn write_bundle(
    output_dir: &Path,
    run_id: &str,
    text: &str,
) -> Result<PathBuf, SummarizeError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let path = output_dir.join(format!("summary-{run_id}.txt"));
    let tmp_path = path.with_extension("txt.tmp");

    tokio::fs::write(&tmp_path, text)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;

    fn ok_page(page_num: usize, summary: &str) -> PageSummary {
        PageSummary {
            page_num,
            summary: summary.to_string(),
            chars_in: summary.len(),
            duration_ms: 1,
            retries: 0,
            error: None,
        }
    }

    fn failed_page(page_num: usize, detail: &str) -> PageSummary {
        PageSummary {
            page_num,
            summary: String::new(),
            chars_in: 10,
            duration_ms: 1,
            retries: 0,
            error: Some(PageError::SummaryFailed {
                page: page_num,
                detail: detail.to_string(),
            }),
        }
    }

    #[test]
    fn effective_count_defaults_to_total() {
        assert_eq!(effective_page_count(5, None), 5);
    }

    #[test]
    fn effective_count_caps_at_total() {
        assert_eq!(effective_page_count(3, Some(10)), 3);
    }

    #[test]
    fn effective_count_honors_zero() {
        assert_eq!(effective_page_count(3, Some(0)), 0);
    }

    #[test]
    fn bundle_has_headers_in_order() {
        let pages = vec![ok_page(1, "one"), ok_page(2, "two"), ok_page(3, "three")];
        let bundle = assemble_bundle(&pages);
        assert_eq!(
            bundle,
            "--- Page 1 ---\none\n\n--- Page 2 ---\ntwo\n\n--- Page 3 ---\nthree\n\n"
        );
    }

    #[test]
    fn bundle_preserves_document_page_numbers() {
        // Page 2 was blank and never attempted; its number is absent.
        let pages = vec![ok_page(1, "one"), ok_page(3, "three")];
        let bundle = assemble_bundle(&pages);
        assert!(bundle.contains("--- Page 1 ---"));
        assert!(!bundle.contains("--- Page 2 ---"));
        assert!(bundle.contains("--- Page 3 ---"));
    }

    #[test]
    fn bundle_renders_failures_inline() {
        let pages = vec![ok_page(1, "fine"), failed_page(2, "HTTP 503: overloaded")];
        let bundle = assemble_bundle(&pages);
        assert!(bundle.contains("--- Page 2 ---\nError during summarization: HTTP 503: overloaded\n\n"));
    }

    #[test]
    fn empty_pages_make_empty_bundle() {
        assert_eq!(assemble_bundle(&[]), "");
    }

    #[tokio::test]
    async fn write_bundle_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let text = "--- Page 1 ---\nhello\n\n";
        let path = write_bundle(dir.path(), "test-run", text).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), text);
        assert!(path.ends_with("summary-test-run.txt"));
    }

    #[tokio::test]
    async fn write_bundle_accepts_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_bundle(dir.path(), "empty-run", "").await.unwrap();
        assert_eq!(tokio::fs::metadata(&path).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn distinct_runs_produce_distinct_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bundle(dir.path(), "run-a", "first").await.unwrap();
        let b = write_bundle(dir.path(), "run-b", "second").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(tokio::fs::read_to_string(&a).await.unwrap(), "first");
        assert_eq!(tokio::fs::read_to_string(&b).await.unwrap(), "second");
    }
}

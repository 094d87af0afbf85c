//! Output types: per-page results, run statistics, and the run output.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of summarizing a single page.
///
/// Always produced for every non-blank page that was attempted, whether or
/// not the service call succeeded. Check [`PageSummary::error`] to tell
/// the two apart; `summary` is empty when an error is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    /// 1-based page number in the original document. Blank pages are
    /// skipped entirely, so these numbers may have gaps.
    pub page_num: usize,
    /// The cleaned summary text (empty on failure).
    pub summary: String,
    /// Length in characters of the extracted page text fed to the model.
    pub chars_in: usize,
    /// Wall-clock duration of both generation calls for this page.
    pub duration_ms: u64,
    /// Number of retries that were needed (0 = first attempt succeeded).
    pub retries: u8,
    /// Set when summarization failed for this page.
    pub error: Option<PageError>,
}

impl PageSummary {
    /// True when the page was summarized successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Statistics for one summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages of extractable text in the document.
    pub total_pages: usize,
    /// Pages selected after applying the requested limit.
    pub selected_pages: usize,
    /// Pages successfully summarized.
    pub processed_pages: usize,
    /// Pages skipped because their text was empty or whitespace-only.
    pub skipped_pages: usize,
    /// Pages whose summarization failed.
    pub failed_pages: usize,
    /// Time spent extracting text from the document.
    pub extract_duration_ms: u64,
    /// Time spent in generation calls (all pages).
    pub llm_duration_ms: u64,
    /// Total wall-clock duration of the run.
    pub total_duration_ms: u64,
}

/// Complete output of one summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// Unique token identifying this run (and its artifact).
    pub run_id: String,
    /// The assembled summary bundle: one `--- Page N ---` block per
    /// attempted page, failures rendered inline.
    pub text: String,
    /// Structured per-page results, in document order.
    pub pages: Vec<PageSummary>,
    /// Run statistics.
    pub stats: RunStats,
    /// Path of the persisted bundle artifact.
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_summary_is_ok() {
        let ok = PageSummary {
            page_num: 1,
            summary: "fine".into(),
            chars_in: 100,
            duration_ms: 10,
            retries: 0,
            error: None,
        };
        assert!(ok.is_ok());

        let failed = PageSummary {
            error: Some(PageError::SummaryFailed {
                page: 1,
                detail: "boom".into(),
            }),
            summary: String::new(),
            ..ok
        };
        assert!(!failed.is_ok());
    }

    #[test]
    fn run_output_serializes() {
        let out = RunOutput {
            run_id: "abc".into(),
            text: "--- Page 1 ---\nhi\n\n".into(),
            pages: vec![],
            stats: RunStats {
                total_pages: 1,
                selected_pages: 1,
                processed_pages: 1,
                skipped_pages: 0,
                failed_pages: 0,
                extract_duration_ms: 1,
                llm_duration_ms: 2,
                total_duration_ms: 3,
            },
            output_path: PathBuf::from("summaries/summary-abc.txt"),
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"run_id\":\"abc\""));
        assert!(json.contains("\"total_pages\":1"));
    }
}

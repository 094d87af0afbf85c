//! Error types for the pdfsum library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummarizeError`] — **Fatal**: the run cannot proceed at all (bad
//!   input file, invalid config, output directory not writable). Returned
//!   as `Err(SummarizeError)` from the top-level entry points.
//!
//! * [`PageError`] — **Non-fatal**: summarization of a single page failed
//!   (service outage, quota, timeout) but the remaining pages are fine.
//!   Stored inside [`crate::output::PageSummary`] so callers can inspect
//!   partial success instead of losing the whole document to one bad page.
//!
//! A malformed PDF is deliberately NOT an error: it degrades to a document
//! with zero extractable pages and an empty bundle (see
//! [`crate::pipeline::extract`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsum library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageSummary`] rather than propagated here.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not store an uploaded file.
    #[error("Failed to store upload '{path}': {source}")]
    UploadWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the summary bundle artifact.
    #[error("Failed to write summary file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageSummary`] when a page fails.
/// The run continues with the remaining pages.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The generation service rejected or failed the request.
    #[error("Page {page}: summarization failed: {detail}")]
    SummaryFailed { page: usize, detail: String },

    /// The generation call exceeded the configured timeout.
    #[error("Page {page}: summarization timed out after {secs}s")]
    Timeout { page: usize, secs: u64 },
}

impl PageError {
    /// The 1-based document page number this error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::SummaryFailed { page, .. } | PageError::Timeout { page, .. } => *page,
        }
    }

    /// The failure description, without the page prefix.
    ///
    /// This is what the bundle assembler inlines after
    /// `Error during summarization: `.
    pub fn detail(&self) -> String {
        match self {
            PageError::SummaryFailed { detail, .. } => detail.clone(),
            PageError::Timeout { secs, .. } => format!("request timed out after {secs}s"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = SummarizeError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = SummarizeError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"PK\x03\x04",
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("not a valid PDF"));
    }

    #[test]
    fn page_error_accessors() {
        let e = PageError::SummaryFailed {
            page: 3,
            detail: "HTTP 429: quota exhausted".into(),
        };
        assert_eq!(e.page(), 3);
        assert_eq!(e.detail(), "HTTP 429: quota exhausted");
        assert!(e.to_string().contains("Page 3"));
    }

    #[test]
    fn timeout_detail_has_no_page_prefix() {
        let e = PageError::Timeout { page: 7, secs: 60 };
        assert_eq!(e.page(), 7);
        assert!(e.detail().contains("60s"));
        assert!(!e.detail().contains("Page 7"));
    }
}

//! Text extraction: parse the document once and split it into pages.
//!
//! ## Why a single parse pass?
//!
//! Re-parsing the whole document for every page would make extraction cost
//! quadratic in page count. Instead the document's full text is extracted
//! once and split on the form-feed control character that the extractor
//! emits at every page boundary; page N of the split IS the text of page N.
//!
//! ## Why catch_unwind?
//!
//! `pdf_extract` can panic on hostile or truncated input rather than
//! returning an error. The parse runs inside `spawn_blocking` (it is
//! CPU-bound and not async-safe to block on) with a `catch_unwind` around
//! it, and both a parse error and a panic degrade to "zero pages": the run
//! produces an empty bundle instead of failing. Garbage that is not even
//! a PDF by magic bytes is rejected up front with a structured error.

use crate::error::SummarizeError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// Control character the extractor emits at every page boundary.
pub const PAGE_BREAK: char = '\u{0c}';

/// Split extracted document text into per-page strings.
///
/// The extractor terminates every page with [`PAGE_BREAK`], so a document
/// of N pages splits into N + 1 segments; the final segment is a trailing
/// artifact and is dropped.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut segments: Vec<&str> = text.split(PAGE_BREAK).collect();
    segments.pop();
    segments.into_iter().map(ToOwned::to_owned).collect()
}

/// Extract the per-page text of a document in one parse pass.
///
/// Returns one `String` per page, in document order, including pages whose
/// text is empty (the caller decides whether to skip them). A document
/// that cannot be parsed yields an empty `Vec` rather than an error.
///
/// # Errors
/// Fails only on input problems detectable before parsing: missing file,
/// unreadable file, or wrong magic bytes.
pub async fn extract_page_texts(path: &Path) -> Result<Vec<String>, SummarizeError> {
    validate_pdf_file(path)?;

    let owned = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(&owned)));
        match result {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                warn!("failed to parse '{}': {e}", owned.display());
                None
            }
            Err(_) => {
                warn!("parser panicked on '{}'", owned.display());
                None
            }
        }
    })
    .await
    .map_err(|e| SummarizeError::Internal(format!("extraction task failed: {e}")))?;

    let pages = text.map(|t| split_pages(&t)).unwrap_or_default();
    debug!("extracted {} pages from '{}'", pages.len(), path.display());
    Ok(pages)
}

/// Count the pages of extractable text in a document.
///
/// Convenience wrapper over [`extract_page_texts`]; a malformed document
/// counts as zero pages.
pub async fn page_count(path: impl AsRef<Path>) -> Result<usize, SummarizeError> {
    Ok(extract_page_texts(path.as_ref()).await?.len())
}

/// Validate that `path` exists, is readable, and starts with `%PDF`.
fn validate_pdf_file(path: &Path) -> Result<(), SummarizeError> {
    if !path.exists() {
        return Err(SummarizeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(SummarizeError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SummarizeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(SummarizeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn split_three_pages() {
        let text = "first page\u{0c}second page\u{0c}third page\u{0c}";
        let pages = split_pages(text);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], "first page");
        assert_eq!(pages[2], "third page");
    }

    #[test]
    fn split_keeps_blank_pages_in_place() {
        let text = "one\u{0c}\u{0c}three\u{0c}";
        let pages = split_pages(text);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1], "");
    }

    #[test]
    fn split_empty_text_is_zero_pages() {
        assert!(split_pages("").is_empty());
    }

    #[test]
    fn split_drops_trailing_artifact() {
        // No page break at all means no complete page.
        assert!(split_pages("stray text without a break").is_empty());
    }

    #[test]
    fn validate_rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 definitely a zip").unwrap();
        let err = validate_pdf_file(f.path()).unwrap_err();
        assert!(matches!(err, SummarizeError::NotAPdf { .. }));
    }

    #[test]
    fn validate_rejects_missing_file() {
        let err = validate_pdf_file(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, SummarizeError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_pdf_degrades_to_zero_pages() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\nthis is not a real pdf body").unwrap();
        let pages = extract_page_texts(f.path()).await.unwrap();
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn page_count_of_malformed_is_zero() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\ngarbage").unwrap();
        assert_eq!(page_count(f.path()).await.unwrap(), 0);
    }
}

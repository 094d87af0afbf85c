//! Pipeline stages for page-by-page summarization.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different extraction backend) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ llm ──▶ polish
//! (pdf text)  (2 calls/page)  (cleanup)
//! ```
//!
//! 1. [`extract`] — parse the document ONCE and split its text into pages;
//!    runs in `spawn_blocking` because PDF parsing is CPU-bound
//! 2. [`llm`]     — drive the two-step generation protocol per page; the
//!    only stage with network I/O
//! 3. [`polish`]  — deterministic text cleanup of model output (fences,
//!    line endings, blank lines)

pub mod extract;
pub mod llm;
pub mod polish;

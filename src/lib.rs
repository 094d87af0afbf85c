//! # pdfsum
//!
//! Summarize PDF documents page by page using an LLM text-generation service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract  one parse pass, split text on form-feed page breaks
//!  ├─ 2. LLM      two sequential prompts per page (elaborate, then clean)
//!  ├─ 3. Polish   deterministic cleanup of model output
//!  └─ 4. Output   per-page blocks assembled into one bundle, persisted
//!                 as a distinct artifact per run
//! ```
//!
//! Pages are processed strictly in document order, one at a time. A page
//! whose extracted text is empty or whitespace-only is skipped entirely:
//! no header, no summary, no API call. A page whose summarization fails
//! is captured as a structured [`PageError`] inside its [`PageSummary`]
//! rather than aborting the run; only the rendered bundle inlines the
//! failure text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsum::{summarize, SummarizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizeConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!     let run = summarize("document.pdf", None, &config).await?;
//!     println!("{}", run.text);
//!     eprintln!("artifact: {}", run.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfsum = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod stream;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SummarizeConfig, SummarizeConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use error::{PageError, SummarizeError};
pub use output::{PageSummary, RunOutput, RunStats};
pub use pipeline::extract::page_count;
pub use server::SummaryServer;
pub use stream::{summarize_stream, PageStream};
pub use summarize::summarize;

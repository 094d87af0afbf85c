//! CLI binary for pdfsum.
//!
//! A thin shim over the library crate: maps flags to `SummarizeConfig`
//! and either runs the pipeline once on a local file or starts the HTTP
//! server.

use anyhow::{Context, Result};
use clap::Parser;
use pdfsum::{summarize, SummarizeConfig, SummaryServer, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the HTTP API on the default port
  pdfsum

  # Upload a document and fetch the bundle
  curl -F pdf=@report.pdf http://127.0.0.1:8080/upload
  curl -OJ http://127.0.0.1:8080/download/<run_id>

  # One-shot: summarize a local file, bundle to stdout
  pdfsum report.pdf

  # Only the first 3 pages
  pdfsum --pages 3 report.pdf

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        API key for the text-generation service
  PDFSUM_MODEL          Override the model identifier
  PDFSUM_API_BASE_URL   Point the client at a different endpoint
  PDFSUM_UPLOAD_DIR     Where raw uploads are stored
  PDFSUM_OUTPUT_DIR     Where summary bundles are written

SETUP:
  1. Set API key:     export GEMINI_API_KEY=...
  2. Summarize:       pdfsum document.pdf
"#;

/// Summarize PDF documents page by page with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarize PDF documents page by page with an LLM",
    long_about = "Summarize PDF documents page by page using an external text-generation \
service. Runs as an HTTP service (multipart upload in, summary bundle out) or as a one-shot \
CLI when given a file path.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file to summarize once. When omitted, start the HTTP server.
    input: Option<PathBuf>,

    /// Summarize at most the first N pages.
    #[arg(short, long, env = "PDFSUM_PAGES")]
    pages: Option<usize>,

    /// Bind address for server mode.
    #[arg(long, env = "PDFSUM_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port for server mode.
    #[arg(long, env = "PDFSUM_PORT", default_value_t = 8080)]
    port: u16,

    /// Directory where raw uploads are stored.
    #[arg(long, env = "PDFSUM_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Directory where summary bundles are written.
    #[arg(long, env = "PDFSUM_OUTPUT_DIR", default_value = "summaries")]
    output_dir: PathBuf,

    /// Model identifier for the text-generation service.
    #[arg(long, env = "PDFSUM_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API key for the text-generation service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the text-generation service.
    #[arg(long, env = "PDFSUM_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Per-call API timeout in seconds.
    #[arg(long, env = "PDFSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Retries per generation call on failure (0 = single attempt).
    #[arg(long, env = "PDFSUM_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Maximum upload size in megabytes.
    #[arg(long, env = "PDFSUM_MAX_UPLOAD_MB", default_value_t = 32)]
    max_upload_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSUM_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = SummarizeConfig::builder()
        .upload_dir(cli.upload_dir.clone())
        .output_dir(cli.output_dir.clone())
        .model(cli.model.clone())
        .api_key(cli.api_key.clone())
        .api_base_url(cli.api_base_url.clone())
        .api_timeout_secs(cli.api_timeout)
        .max_retries(cli.max_retries)
        .max_upload_bytes(cli.max_upload_mb * 1024 * 1024)
        .build()
        .context("Invalid configuration")?;

    match cli.input {
        // ── One-shot mode ────────────────────────────────────────────────
        Some(ref input) => {
            let run = summarize(input, cli.pages, &config)
                .await
                .context("Summarization failed")?;

            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(run.text.as_bytes())
                .context("Failed to write to stdout")?;

            if !cli.quiet {
                eprintln!(
                    "{}/{} pages summarized in {}ms  →  {}",
                    run.stats.processed_pages,
                    run.stats.selected_pages,
                    run.stats.total_duration_ms,
                    run.output_path.display(),
                );
                if run.stats.failed_pages > 0 {
                    eprintln!("  {} pages failed", run.stats.failed_pages);
                }
            }
        }
        // ── Server mode ──────────────────────────────────────────────────
        None => {
            SummaryServer::new(&cli.bind, cli.port, config)
                .serve()
                .await
                .context("Server failed")?;
        }
    }

    Ok(())
}

//! Configuration types for page-by-page summarization.
//!
//! All pipeline and server behaviour is controlled through
//! [`SummarizeConfig`], built via its [`SummarizeConfigBuilder`]. Keeping
//! every knob in one struct makes it trivial to share a config between the
//! HTTP handlers and one-shot CLI runs, and to log it for diagnosing why two
//! runs behaved differently.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about (usually just the
//! API key) and rely on documented defaults for the rest.

use crate::error::SummarizeError;
use std::fmt;
use std::path::PathBuf;

/// Default model identifier sent with every generation request.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default base URL of the text-generation service.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for a summarization run (and for the HTTP server).
///
/// Built via [`SummarizeConfig::builder()`] or [`SummarizeConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfsum::SummarizeConfig;
///
/// let config = SummarizeConfig::builder()
///     .model("gemini-2.0-flash")
///     .api_key("test-key")
///     .output_dir("summaries")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummarizeConfig {
    /// Directory where raw uploads are stored, by original filename.
    /// Default: `uploads`.
    ///
    /// Uploads accumulate; nothing in the pipeline deletes them.
    pub upload_dir: PathBuf,

    /// Directory where summary bundles are written. Default: `summaries`.
    ///
    /// Each run writes its own `summary-<run_id>.txt`, so concurrent runs
    /// never clobber each other's output.
    pub output_dir: PathBuf,

    /// Model identifier for the text-generation service.
    /// Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// API credential for the text-generation service.
    ///
    /// Never logged; the `Debug` impl redacts it.
    pub api_key: String,

    /// Base URL of the text-generation service. Default:
    /// [`DEFAULT_API_BASE_URL`].
    ///
    /// Overridable so tests and self-hosted gateways can point the client
    /// at a different endpoint without touching the request code.
    pub api_base_url: String,

    /// Per-request timeout for generation calls, in seconds. Default: 60.
    ///
    /// The service gives no latency bound; without a client-side timeout a
    /// hanging call would stall the whole run, since pages are processed
    /// sequentially.
    pub api_timeout_secs: u64,

    /// Retry attempts per generation call on failure. Default: 0.
    ///
    /// The default preserves single-attempt semantics: a failed call is
    /// recorded as that page's error immediately. Raise this for flaky
    /// networks; retries back off exponentially from `retry_backoff_ms`.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff).
    /// Default: 500.
    pub retry_backoff_ms: u64,

    /// Maximum accepted upload size in bytes (HTTP server only).
    /// Default: 32 MiB.
    pub max_upload_bytes: usize,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("summaries"),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_secs: 60,
            max_retries: 0,
            retry_backoff_ms: 500,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for SummarizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfig")
            .field("upload_dir", &self.upload_dir)
            .field("output_dir", &self.output_dir)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl SummarizeConfig {
    /// Create a new builder for `SummarizeConfig`.
    pub fn builder() -> SummarizeConfigBuilder {
        SummarizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizeConfig`].
#[derive(Debug)]
pub struct SummarizeConfigBuilder {
    config: SummarizeConfig,
}

impl SummarizeConfigBuilder {
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes.max(1024);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizeConfig, SummarizeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if !c.api_base_url.starts_with("http://") && !c.api_base_url.starts_with("https://") {
            return Err(SummarizeError::InvalidConfig(format!(
                "API base URL must be an HTTP/HTTPS URL, got '{}'",
                c.api_base_url
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SummarizeConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.output_dir, PathBuf::from("summaries"));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.api_timeout_secs, 60);
    }

    #[test]
    fn builder_overrides() {
        let config = SummarizeConfig::builder()
            .model("gemini-2.5-pro")
            .api_key("k")
            .output_dir("/tmp/out")
            .api_timeout_secs(5)
            .max_retries(2)
            .build()
            .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.api_timeout_secs, 5);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn empty_model_rejected() {
        let err = SummarizeConfig::builder().model("  ").build().unwrap_err();
        assert!(err.to_string().contains("Model identifier"));
    }

    #[test]
    fn bad_base_url_rejected() {
        let err = SummarizeConfig::builder()
            .api_base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("base URL"));
    }

    #[test]
    fn timeout_clamped_to_minimum() {
        let config = SummarizeConfig::builder()
            .api_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(config.api_timeout_secs, 1);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SummarizeConfig::builder()
            .api_key("super-secret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

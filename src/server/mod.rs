//! HTTP boundary: multipart upload in, summary bundle out.

mod handlers;
mod router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: Arc<SummarizeConfig>,
    pub started_at: Instant,
}

/// The summarization HTTP server.
///
/// Routes:
/// - `POST /upload` — multipart form with a `pdf` file field and an
///   optional `num_pages` field; stores the upload, runs the pipeline,
///   returns the run as JSON
/// - `GET /download/{run_id}` — serves that run's bundle as an attachment
/// - `GET /health` — status and uptime
pub struct SummaryServer {
    addr: SocketAddr,
    config: Arc<SummarizeConfig>,
}

impl SummaryServer {
    #[must_use]
    pub fn new(bind: &str, port: u16, config: SummarizeConfig) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("binding to 0.0.0.0 — ensure this is intended for production");
        }

        Self {
            addr,
            config: Arc::new(config),
        }
    }

    /// Start serving. Runs until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or hits a fatal I/O
    /// error.
    pub async fn serve(self) -> Result<(), SummarizeError> {
        let max_body_size = self.config.max_upload_bytes;
        let state = AppState {
            config: self.config,
            started_at: Instant::now(),
        };

        let router = router::build_router(state, max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| SummarizeError::Internal(format!("failed to bind {}: {e}", self.addr)))?;
        tracing::info!("listening on {}", self.addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| SummarizeError::Internal(format!("server error: {e}")))?;

        Ok(())
    }
}

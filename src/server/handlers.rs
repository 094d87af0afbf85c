use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;
use crate::error::SummarizeError;
use crate::output::RunStats;
use crate::summarize::summarize;

#[derive(serde::Serialize)]
pub(crate) struct UploadResponse {
    run_id: String,
    summary: String,
    download: String,
    pages: Vec<PageOutcome>,
    stats: RunStats,
}

#[derive(serde::Serialize)]
struct PageOutcome {
    page: usize,
    ok: bool,
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

pub(crate) async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut pdf: Option<(String, Bytes)> = None;
    let mut num_pages: Option<usize> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Malformed upload body: {e}"))
                    .into_response();
            }
        };

        // Take the name as owned up front: reading the field body consumes it.
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => pdf = Some((filename, bytes)),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file field: {e}"),
                        )
                            .into_response();
                    }
                }
            }
            "num_pages" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read num_pages field: {e}"),
                        )
                            .into_response();
                    }
                };
                let value = value.trim().to_string();
                if !value.is_empty() {
                    match value.parse::<usize>() {
                        Ok(n) => num_pages = Some(n),
                        Err(_) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                format!("num_pages must be a non-negative integer, got '{value}'"),
                            )
                                .into_response();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let Some((filename, data)) = pdf else {
        return (StatusCode::BAD_REQUEST, "No file part").into_response();
    };
    if filename.is_empty() {
        return (StatusCode::BAD_REQUEST, "No selected file").into_response();
    }

    let filename = sanitize_filename(&filename);
    let upload_path = state.config.upload_dir.join(&filename);

    if let Err(e) = store_upload(&state.config.upload_dir, &upload_path, &data).await {
        warn!("{e}");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }
    info!("stored upload: {} ({} bytes)", upload_path.display(), data.len());

    match summarize(&upload_path, num_pages, &state.config).await {
        Ok(run) => {
            let pages = run
                .pages
                .iter()
                .map(|p| PageOutcome {
                    page: p.page_num,
                    ok: p.is_ok(),
                    error: p.error.as_ref().map(|e| e.to_string()),
                })
                .collect();
            let response = UploadResponse {
                download: format!("/download/{}", run.run_id),
                run_id: run.run_id,
                summary: run.text,
                pages,
                stats: run.stats,
            };
            Json(response).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Summarization failed: {e}"),
        )
            .into_response(),
    }
}

pub(crate) async fn download_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    // Run ids are UUIDs; anything else (including path tricks) is a 404.
    if Uuid::parse_str(&run_id).is_err() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.output_dir.join(format!("summary-{run_id}.txt"));
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let headers = [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"summary-{run_id}.txt\""),
                ),
            ];
            (headers, bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Persist an uploaded document under the upload directory.
async fn store_upload(
    dir: &std::path::Path,
    path: &std::path::Path,
    data: &Bytes,
) -> Result<(), SummarizeError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| SummarizeError::UploadWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    tokio::fs::write(path, data)
        .await
        .map_err(|e| SummarizeError::UploadWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Reduce a client-supplied filename to its final path component.
fn sanitize_filename(name: &str) -> String {
    let name = std::path::Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    if name.is_empty() {
        "upload.pdf".to_string()
    } else {
        name
    }
}

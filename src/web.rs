//! HTTP boundary: one endpoint, `POST /api/compare`.
//!
//! Auth, HTML templating and static serving are out of scope (spec §1) —
//! this module only implements the route's request/response contract. A
//! `tower` layer (session auth, rate limiting, ...) can be composed in
//! front of the router returned by [`create_router`] without touching
//! [`compare_handler`].

use crate::comparator;
use crate::detector::{self, DetectorWindows};
use crate::error::ReconError;
use crate::skud;
use crate::tabell::{self, TabellSource};
use crate::upload::StagedUpload;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use chrono::NaiveDate;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared, immutable server configuration threaded into every handler.
///
/// Holds no mutable state: each request stages its own upload under
/// `upload_dir` and cleans it up on the way out, so concurrent requests
/// never contend with each other.
pub struct AppState {
    pub tabell_source: Arc<dyn TabellSource>,
    pub upload_dir: PathBuf,
    pub windows: DetectorWindows,
}

impl AppState {
    pub fn new(tabell_source: Arc<dyn TabellSource>, upload_dir: PathBuf) -> Self {
        Self {
            tabell_source,
            upload_dir,
            windows: DetectorWindows::default(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/compare", post(compare_handler))
        .with_state(state)
}

/// `POST /api/compare`
///
/// Multipart form: `xlsx_file`, `date_from`, `date_to` (`YYYY-MM-DD`).
/// The tabell is read from the source configured in [`AppState`], not
/// from the request — the CLI is where a caller points at an arbitrary
/// local CSV.
async fn compare_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let started = std::time::Instant::now();
    match handle(&state, &mut multipart).await {
        Ok(body) => {
            tracing::info!(
                employees = body
                    .get("summary")
                    .and_then(|s| s.get("total_employees_tabell"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                broken = body
                    .get("summary")
                    .and_then(|s| s.get("broken_count"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                duration_ms = started.elapsed().as_millis() as u64,
                "compare request succeeded"
            );
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => api_error_response(e),
    }
}

async fn handle(state: &AppState, multipart: &mut Multipart) -> Result<serde_json::Value, ReconError> {
    let mut xlsx_bytes: Option<Vec<u8>> = None;
    let mut date_from: Option<String> = None;
    let mut date_to: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ReconError::BadInput(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "xlsx_file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ReconError::BadInput(format!("reading xlsx_file: {e}")))?;
                xlsx_bytes = Some(bytes.to_vec());
            }
            "date_from" => {
                date_from = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ReconError::BadInput(format!("reading date_from: {e}")))?,
                );
            }
            "date_to" => {
                date_to = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ReconError::BadInput(format!("reading date_to: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let xlsx_bytes = xlsx_bytes.ok_or_else(|| ReconError::BadInput("missing xlsx_file field".to_string()))?;
    let date_from = parse_date(&date_from.ok_or_else(|| ReconError::BadInput("missing date_from field".to_string()))?)?;
    let date_to = parse_date(&date_to.ok_or_else(|| ReconError::BadInput("missing date_to field".to_string()))?)?;
    if date_from > date_to {
        return Err(ReconError::BadInput(format!("date_from ({date_from}) is after date_to ({date_to})")));
    }

    let upload_dir = state.upload_dir.clone();
    let staged = tokio::task::spawn_blocking(move || StagedUpload::stage(&upload_dir, &xlsx_bytes))
        .await
        .map_err(|e| ReconError::Other(anyhow::anyhow!("upload staging task panicked: {e}")))??;
    let path = staged.path().to_path_buf();

    let source = state.tabell_source.clone();
    let tabell_entries = tokio::task::spawn_blocking(move || tabell::fetch_tabell(source.as_ref(), date_from, date_to))
        .await
        .map_err(|e| ReconError::Other(anyhow::anyhow!("tabell fetch task panicked: {e}")))??;
    let punches = tokio::task::spawn_blocking(move || skud::parse_skud_xlsx(path, date_from, date_to))
        .await
        .map_err(|e| ReconError::Other(anyhow::anyhow!("xlsx parse task panicked: {e}")))??;
    drop(staged);

    let (shifts_by_employee, broken_shifts) = detector::detect_all_shifts(&punches, date_from, date_to, &state.windows);
    let result = comparator::compare(&shifts_by_employee, &broken_shifts, &tabell_entries, date_from, date_to);

    serde_json::to_value(result).map_err(|e| ReconError::Other(e.into()))
}

fn parse_date(value: &str) -> Result<NaiveDate, ReconError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ReconError::BadInput(format!("invalid date (expected YYYY-MM-DD): {value}")))
}

fn api_error_response(e: ReconError) -> Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    tracing::warn!(status = %status, error = %e, "request failed");
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

//! Route handlers.

use std::time::Instant;

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::http::request::request_id;
use crate::http::response::{ApiError, SubmitResponse};
use crate::http::server::AppState;
use crate::observability::metrics::{self, Outcome};
use crate::submission::validate_body;

/// `POST /api/submit`: validate one submission and append it to the sink.
///
/// The rate limit has already been applied by the time this runs.
pub async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request_id = request_id(&headers);

    let submission = validate_body(&body).inspect_err(|e| {
        tracing::debug!(request_id = %request_id, field = e.field(), "Submission rejected");
        metrics::record_submission(Outcome::Invalid);
    })?;

    let genre = submission.genre;
    let row = submission.into_row(state.clock.now());

    let started = Instant::now();
    let appended = state.sink.append(row).await;
    metrics::record_sink_append(started);

    if let Err(e) = appended {
        tracing::error!(request_id = %request_id, error = %e, "Submission error");
        metrics::record_submission(Outcome::SinkError);
        return Err(ApiError::SaveFailed);
    }

    tracing::info!(request_id = %request_id, genre = %genre, "Submission accepted");
    metrics::record_submission(Outcome::Accepted);
    Ok(Json(SubmitResponse::ok()))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

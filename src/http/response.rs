//! Response bodies and error mapping for the HTTP surface.
//!
//! # Design Decisions
//! - Every failure is a JSON object `{ "error": "<message>" }`
//! - Messages are fixed per variant; internal causes are logged, never returned

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::submission::ValidationError;

/// Body of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Request failures, one per client-visible outcome.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body or a failed field rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Too many submissions. Please try again later.")]
    RateLimited,

    /// The sink refused the row, or something unexpected went wrong.
    #[error("Failed to save submission. Please try again.")]
    SaveFailed,

    /// Body over `security.max_body_size`.
    #[error("Submission is too large.")]
    TooLarge,

    /// The request ran past `timeouts.request_secs`.
    #[error("Request timed out. Please try again.")]
    TimedOut,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::SaveFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TimedOut => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

/// Give the bare 408 and 413 answers produced by middleware and extractors
/// the same JSON body as every other failure.
pub async fn json_error_bodies(response: Response) -> Response {
    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::TooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => ApiError::TimedOut.into_response(),
        _ => response,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            ApiError::from(ValidationError::Genre).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::SaveFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::TooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::TimedOut.status(), StatusCode::REQUEST_TIMEOUT);
    }

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bare_timeout_gets_a_json_body() {
        let bare = StatusCode::REQUEST_TIMEOUT.into_response();
        let mapped = json_error_bodies(bare).await;
        assert_eq!(mapped.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_of(mapped).await,
            serde_json::json!({"error": "Request timed out. Please try again."})
        );
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let response = ApiError::RateLimited.into_response();
        let mapped = json_error_bodies(response).await;
        assert_eq!(mapped.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_of(mapped).await,
            serde_json::json!({"error": "Too many submissions. Please try again later."})
        );
    }

    #[test]
    fn validation_message_passes_through() {
        let err = ApiError::from(ValidationError::Name);
        assert_eq!(err.to_string(), "Name must be at most 100 characters.");
    }

    #[tokio::test]
    async fn error_body_is_json() {
        let response = ApiError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "Too many submissions. Please try again later."})
        );
    }
}

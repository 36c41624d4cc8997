//! HTTP error type and its JSON envelope.

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use debate_rag::RagError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Routes listed in the not-found message.
pub const AVAILABLE_ROUTES: &str =
    "/health, /api/rag-status, /api/generate-counter-arguments, /api/llm-debate";

/// Message returned for unexpected failures; details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// The client exceeded its request budget.
    #[error("Too many requests. Please try again later")]
    RateLimited { retry_after: Duration },

    #[error("Route {path} not found. Available routes: {routes}", routes = AVAILABLE_ROUTES)]
    NotFound { path: String },

    /// Anything unexpected; the detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RagError> for ApiError {
    fn from(e: RagError) -> Self {
        Self::Internal(e.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_ms: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retry_after) = match &self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone(), None),
            Self::RateLimited { retry_after } => {
                (StatusCode::TOO_MANY_REQUESTS, self.to_string(), Some(*retry_after))
            }
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string(), None),
            Self::Internal(detail) => {
                error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            retry_after_ms: retry_after.map(|d| d.as_millis() as u64),
        };
        let mut response = (status, Json(body)).into_response();

        if let Some(retry_after) = retry_after {
            // whole seconds, rounded up
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        assert_eq!(ApiError::BadRequest("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound { path: "/nope".into() }.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rate_limited_sets_retry_after() {
        let response =
            ApiError::RateLimited { retry_after: Duration::from_millis(1500) }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }

    #[test]
    fn not_found_lists_routes() {
        let message = ApiError::NotFound { path: "/api/unknown".into() }.to_string();
        assert!(message.starts_with("Route /api/unknown not found."));
        assert!(message.contains("/api/generate-counter-arguments"));
    }
}

//! API error type and its JSON rendering.
//!
//! Every error body has the same shape:
//!
//! ```json
//! { "error": "AI error: Rate limit exceeded: ...", "kind": "rate_limited", "retry": true }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use gnotes_core::FailureKind;

/// Shown when a request was rejected for lack of confirmation.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this note?";

/// Shown when a handler panicked.
pub const PANIC_MESSAGE: &str = "Something went wrong. Please reload the page and try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage, search, or validation failure.
    #[error("{0}")]
    Core(#[from] gnotes_core::Error),
    /// Failure of an AI writing aid.
    #[error("AI error: {0}")]
    Ai(gnotes_core::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub retry: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) | ApiError::Ai(e) => status_for(e.kind()),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn body(&self) -> ErrorBody {
        let (kind, retry) = match self {
            ApiError::Core(e) | ApiError::Ai(e) => (kind_name(e.kind()), e.is_retryable()),
            ApiError::BadRequest(_) => (kind_name(FailureKind::Validation), false),
            ApiError::Conflict(_) => ("conflict", false),
        };
        ErrorBody {
            error: self.to_string(),
            kind,
            retry,
        }
    }
}

/// HTTP status for a failure category.
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FailureKind::MalformedResponse | FailureKind::Upstream => StatusCode::BAD_GATEWAY,
        FailureKind::Network => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn kind_name(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Network => "network",
        FailureKind::Unauthorized => "unauthorized",
        FailureKind::RateLimited => "rate_limited",
        FailureKind::MalformedResponse => "malformed_response",
        FailureKind::Validation => "validation",
        FailureKind::NotFound => "not_found",
        FailureKind::Upstream => "upstream",
        FailureKind::Internal => "internal",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(subsystem = "api", status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

//! Error types for GenAI Notes.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure category of an [`Error`].
///
/// Callers use this to choose a user-facing status and to decide whether an
/// operation may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, timed out, DNS failure.
    Network,
    /// Rejected credentials or missing permission.
    Unauthorized,
    /// Upstream rate limit.
    RateLimited,
    /// Upstream replied successfully but the body was not what we expected.
    MalformedResponse,
    /// Caller supplied invalid input.
    Validation,
    /// Requested entity does not exist.
    NotFound,
    /// Upstream returned some other non-success status.
    Upstream,
    /// Anything else.
    Internal,
}

/// Core error type for GenAI Notes operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Invalid input (form validation, empty prompts)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed before a response arrived
    #[error("Request error: {0}")]
    Request(String),

    /// Authentication/authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Upstream rate limit hit
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Upstream response was missing expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Completion request returned a non-success status
    #[error("Inference error: {0}")]
    Inference(String),

    /// Embedding request returned a non-success status
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Database(e) => classify_sqlx(e),
            Error::NotFound(_) | Error::NoteNotFound(_) => FailureKind::NotFound,
            Error::InvalidInput(_) => FailureKind::Validation,
            Error::Request(_) => FailureKind::Network,
            Error::Unauthorized(_) => FailureKind::Unauthorized,
            Error::RateLimited(_) => FailureKind::RateLimited,
            Error::MalformedResponse(_) => FailureKind::MalformedResponse,
            Error::Inference(_) | Error::Embedding(_) => FailureKind::Upstream,
            Error::Config(_) | Error::Serialization(_) | Error::Internal(_) | Error::Io(_) => {
                FailureKind::Internal
            }
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::Network
                | FailureKind::RateLimited
                | FailureKind::MalformedResponse
                | FailureKind::Upstream
        )
    }
}

/// Map sqlx errors onto the failure taxonomy.
///
/// Connection-level problems are network failures; SQLSTATE class 28
/// (invalid authorization) and 42501 (insufficient privilege) are
/// authorization failures.
fn classify_sqlx(err: &sqlx::Error) -> FailureKind {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => FailureKind::Network,
        sqlx::Error::RowNotFound => FailureKind::NotFound,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(code) if code.starts_with("28") || code == "42501" => FailureKind::Unauthorized,
            _ => FailureKind::Internal,
        },
        _ => FailureKind::Internal,
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::MalformedResponse(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_note_not_found() {
        let id = Uuid::nil();
        let err = Error::NoteNotFound(id);
        assert_eq!(err.to_string(), format!("Note not found: {}", id));
    }

    #[test]
    fn test_error_display_rate_limited_keeps_upstream_text() {
        let err = Error::RateLimited("You exceeded your current quota".to_string());
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded: You exceeded your current quota"
        );
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::Request("x".into()).kind(), FailureKind::Network);
        assert_eq!(Error::Unauthorized("x".into()).kind(), FailureKind::Unauthorized);
        assert_eq!(Error::RateLimited("x".into()).kind(), FailureKind::RateLimited);
        assert_eq!(
            Error::MalformedResponse("x".into()).kind(),
            FailureKind::MalformedResponse
        );
        assert_eq!(Error::InvalidInput("x".into()).kind(), FailureKind::Validation);
        assert_eq!(Error::NoteNotFound(Uuid::nil()).kind(), FailureKind::NotFound);
        assert_eq!(Error::Inference("x".into()).kind(), FailureKind::Upstream);
        assert_eq!(Error::Config("x".into()).kind(), FailureKind::Internal);
    }

    #[test]
    fn test_sqlx_pool_timeout_is_network() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), FailureKind::Network);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_sqlx_row_not_found_is_not_found() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(Error::Request("timeout".into()).is_retryable());
        assert!(Error::RateLimited("slow down".into()).is_retryable());
        assert!(Error::MalformedResponse("no choices".into()).is_retryable());
        assert!(Error::Inference("500".into()).is_retryable());
        assert!(!Error::Unauthorized("bad key".into()).is_retryable());
        assert!(!Error::InvalidInput("empty".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::MalformedResponse).unwrap();
        assert_eq!(json, "\"malformed_response\"");
    }
}

//! OpenAI-specific error handling.

use gnotes_core::Error;

/// Which endpoint a failed request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Completion,
    Embedding,
}

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid or missing credentials (401) or no permission (403).
    AuthenticationError,
    /// Rate limit or quota exceeded.
    RateLimitExceeded,
    /// 5xx from the provider.
    ServerError,
    /// Any other non-success status.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError,
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a non-success response into a core error.
///
/// The response body is kept verbatim in the message.
pub fn to_core_error(endpoint: Endpoint, status: u16, body: &str) -> Error {
    match OpenAIErrorCode::from_status(status) {
        OpenAIErrorCode::AuthenticationError => Error::Unauthorized(body.to_string()),
        OpenAIErrorCode::RateLimitExceeded => Error::RateLimited(body.to_string()),
        OpenAIErrorCode::ServerError | OpenAIErrorCode::Unknown => match endpoint {
            Endpoint::Completion => Error::Inference(format!("AI API error: {}", body)),
            Endpoint::Embedding => Error::Embedding(format!("AI API error: {}", body)),
        },
    }
}

//! Completion error types and handling

use thiserror::Error;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors that can occur when obtaining a completion
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Endpoint answered with a non-success status
    #[error("HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Successful status, but the body carried an `error` object
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
    },

    /// Body is missing the `choices` array or it is empty
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// First choice carried no content
    #[error("Empty content in response")]
    EmptyContent,

    /// Transport-level failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be read or decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request rejected before dispatch
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Attempts exhausted without a recorded error
    #[error("Unknown error")]
    Unknown,
}

impl CompletionError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures to build the request are the caller's fault, failures while
/// reading a received body are fatal, and anything else happened on the
/// wire before a response arrived.
impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            CompletionError::InvalidRequest(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            CompletionError::Network(err.to_string())
        } else if err.is_decode() || err.is_body() {
            CompletionError::Decode(err.to_string())
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::Decode(err.to_string())
    }
}

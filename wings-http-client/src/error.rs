//! Evaluation client error types.

use thiserror::Error;
use wings_core::ResolutionError;

/// Result type for evaluation client operations.
pub type Result<T> = std::result::Result<T, EvaluationError>;

/// Evaluation client errors.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The service answered with a classified non-200 status.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The caller cancelled the evaluation.
    #[error("Evaluation cancelled")]
    Cancelled,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The status arrived but reading the body failed.
    #[error("Failed to read {status} response body: {message}")]
    BodyRead {
        /// HTTP status code already received.
        status: u16,
        /// Read error message.
        message: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent as given.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl EvaluationError {
    /// Check if this error was caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The classified resolution error, if the service produced one.
    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            Self::Resolution(e) => Some(e),
            _ => None,
        }
    }

    /// Get the HTTP status code, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BodyRead { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a transport-level failure (no HTTP status observed).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Http(e) => e.status().is_none(),
            _ => false,
        }
    }
}

//! Resolution error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of a resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unclassified failure (server errors, transport, decoding).
    General,
    /// The evaluation context was rejected by the service.
    InvalidContext,
    /// The requested flag does not exist.
    FlagNotFound,
}

impl ErrorKind {
    /// Wire/display name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::InvalidContext => "INVALID_CONTEXT",
            Self::FlagNotFound => "FLAG_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure returned instead of a resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ResolutionError {
    kind: ErrorKind,
    message: String,
}

impl ResolutionError {
    /// Create a resolution error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a `GENERAL` resolution error.
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::General, message)
    }

    /// Create an `INVALID_CONTEXT` resolution error.
    pub fn invalid_context(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidContext, message)
    }

    /// Create a `FLAG_NOT_FOUND` resolution error.
    pub fn flag_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FlagNotFound, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, documented failure categories reported to callers.
///
/// Absence of an object is not an error kind: Read returns an empty result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, malformed, or rejected credential. Never says which.
    Unauthenticated,
    /// The caller's expected version does not match the current one.
    Conflict,
    /// A required field is missing or a value is out of range.
    MalformedRequest,
    /// A dependency (registry, persistence) is down; retrying may help.
    Unavailable,
    /// Unexpected failure, including a body that fails its integrity check.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Conflict => "conflict",
            Self::MalformedRequest => "malformed_request",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }

    /// Whether the same request may succeed if simply sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

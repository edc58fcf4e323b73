use vos_auth::AuthError;
use vos_protocol::ErrorKind;
use vos_store::StoreError;
use vos_types::{ObjectKey, TypeError, Version};

/// Errors from object store operations.
///
/// Absence on Read is not an error; it is an empty response.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Unauthenticated(#[from] AuthError),

    /// The caller's expected version does not match the stored head.
    #[error("version conflict on {key}: expected {}, current {}", show(.expected), show(.current))]
    Conflict {
        key: ObjectKey,
        expected: Option<Version>,
        current: Option<Version>,
    },

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("malformed request: {0}")]
    InvalidName(#[from] TypeError),

    #[error("dependency unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

fn show(v: &Option<Version>) -> String {
    match v {
        Some(v) => format!("\"{v}\""),
        None => "absent".to_string(),
    }
}

impl ServiceError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    /// The stable category reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::MalformedRequest(_) | Self::InvalidName(_) => ErrorKind::MalformedRequest,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        if e.is_unavailable() {
            Self::Unavailable(e.to_string())
        } else {
            Self::Internal(e.to_string())
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

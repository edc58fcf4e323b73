use vos_crypto::CredentialError;

/// Failure of the identity registry collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry cannot be reached or is not serving.
    #[error("identity registry unavailable: {0}")]
    Unavailable(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Why a credential did not resolve to a usable principal.
///
/// Internal only: callers outside this crate see [`AuthError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Malformed(#[from] CredentialError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error(transparent)]
    Unavailable(#[from] RegistryError),
}

impl ResolveError {
    /// Short, stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::NotFound(_) => "not_found",
            Self::PolicyViolation(_) => "policy_violation",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// The only failure the authenticator reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },
}

impl AuthError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unauthenticated { message } => message,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Errors from persistence operations.
///
/// Version conflicts are not errors: they are reported through
/// [`crate::PutOutcome`] and [`crate::DeleteOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot serve requests right now (lock poisoned, worker
    /// pool gone, database busy). Callers may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Error reported by SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A persisted record could not be decoded.
    #[error("corrupt record for {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for failures of the dependency itself rather than of
    /// the data it holds.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Database(_) | Self::Io(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

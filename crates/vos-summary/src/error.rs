/// Errors raised while deriving a summary from an object body.
///
/// None of these ever fail a write: the registry logs them and stores the
/// version without a summary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body parsed but does not have the shape the extractor expects.
    #[error("unexpected {kind} body: {reason}")]
    InvalidShape { kind: String, reason: String },

    /// The extractor panicked; the panic was contained.
    #[error("extractor for {kind} panicked: {message}")]
    Panicked { kind: String, message: String },
}

impl ExtractError {
    pub fn shape(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

use vos_types::Summary;

use crate::error::ExtractError;

/// Derives a [`Summary`] from the raw body of one object kind.
///
/// Extractors are registered once at startup and shared read-only across
/// requests, so they must be `Send + Sync` and hold no mutable state.
pub trait SummaryExtractor: Send + Sync {
    /// The object kind this extractor handles (e.g. `"dashboard"`).
    fn kind(&self) -> &str;

    /// Derive a summary. `Ok(None)` means the body has nothing to summarize.
    fn extract(&self, body: &[u8]) -> Result<Option<Summary>, ExtractError>;
}

/// The extractor used for kinds with no registered handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSummary;

impl SummaryExtractor for NoSummary {
    fn kind(&self) -> &str {
        "*"
    }

    fn extract(&self, _body: &[u8]) -> Result<Option<Summary>, ExtractError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_summary_ignores_any_body() {
        assert_eq!(NoSummary.extract(b"not json at all").unwrap(), None);
        assert_eq!(NoSummary.extract(b"").unwrap(), None);
    }
}

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use vos_types::Summary;

use crate::error::ExtractError;
use crate::extractor::{NoSummary, SummaryExtractor};
use crate::extractors::{DashboardExtractor, PlaylistExtractor};

/// Kind-keyed table of summary extractors.
///
/// Built once through [`SummaryRegistryBuilder`] and read-only afterwards;
/// there is no runtime registration. Unknown kinds resolve to [`NoSummary`].
pub struct SummaryRegistry {
    extractors: HashMap<String, Box<dyn SummaryExtractor>>,
    fallback: NoSummary,
}

impl SummaryRegistry {
    /// Start building a registry.
    pub fn builder() -> SummaryRegistryBuilder {
        SummaryRegistryBuilder::default()
    }

    /// A registry with no extractors: every kind yields no summary.
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// A registry with the built-in `dashboard` and `playlist` extractors.
    pub fn with_builtin() -> Self {
        Self::builder()
            .register(DashboardExtractor)
            .register(PlaylistExtractor)
            .build()
    }

    /// The extractor for `kind`, or the no-op extractor.
    pub fn extractor_for(&self, kind: &str) -> &dyn SummaryExtractor {
        match self.extractors.get(kind) {
            Some(extractor) => extractor.as_ref(),
            None => &self.fallback,
        }
    }

    /// Whether a dedicated extractor is registered for `kind`.
    pub fn handles(&self, kind: &str) -> bool {
        self.extractors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Run the extractor for `kind`, containing panics.
    pub fn extract(&self, kind: &str, body: &[u8]) -> Result<Option<Summary>, ExtractError> {
        let extractor = self.extractor_for(kind);
        match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(body))) {
            Ok(result) => result,
            Err(payload) => Err(ExtractError::Panicked {
                kind: kind.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Best-effort extraction: any failure is logged and becomes "no summary".
    pub fn summarize(&self, kind: &str, body: &[u8]) -> Option<Summary> {
        match self.extract(kind, body) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(kind, error = %e, "summary extraction failed; storing without summary");
                None
            }
        }
    }
}

impl Default for SummaryRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for SummaryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Collects extractors before freezing them into a [`SummaryRegistry`].
#[derive(Default)]
pub struct SummaryRegistryBuilder {
    extractors: HashMap<String, Box<dyn SummaryExtractor>>,
}

impl SummaryRegistryBuilder {
    /// Register an extractor under its [`SummaryExtractor::kind`]. A later
    /// registration for the same kind replaces the earlier one.
    pub fn register(mut self, extractor: impl SummaryExtractor + 'static) -> Self {
        self.extractors
            .insert(extractor.kind().to_string(), Box::new(extractor));
        self
    }

    pub fn build(self) -> SummaryRegistry {
        SummaryRegistry {
            extractors: self.extractors,
            fallback: NoSummary,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

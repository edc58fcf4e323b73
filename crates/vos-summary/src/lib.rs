//! Summary extraction for the object store.
//!
//! A summary is a lightweight projection of an object body used for listing
//! without hydrating the full payload. Extraction is keyed by object kind and
//! is strictly best-effort: unknown kinds get no summary, and extractor
//! errors or panics are contained and logged rather than failing the write.
//!
//! # Quick Start
//!
//! ```rust
//! use vos_summary::SummaryRegistry;
//!
//! let registry = SummaryRegistry::with_builtin();
//! let summary = registry
//!     .summarize("dashboard", br#"{"title":"Ops","tags":["prod"]}"#)
//!     .unwrap();
//! assert_eq!(summary.name, "Ops");
//! assert!(registry.summarize("unknown-kind", b"anything").is_none());
//! ```

pub mod error;
pub mod extractor;
pub mod extractors;
pub mod registry;

pub use error::ExtractError;
pub use extractor::{NoSummary, SummaryExtractor};
pub use extractors::{DashboardExtractor, PlaylistExtractor};
pub use registry::{SummaryRegistry, SummaryRegistryBuilder};

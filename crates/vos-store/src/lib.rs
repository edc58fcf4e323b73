//! Versioned object persistence.
//!
//! Defines the [`ObjectStore`] trait and two backends:
//!
//! - [`InMemoryObjectStore`]: map-based, for tests and embedding
//! - [`SqliteObjectStore`]: durable, rusqlite with bundled SQLite
//!
//! Writes and deletes are conditional on the caller's expected head version.
//! A failed expectation is reported as a [`PutOutcome::Conflict`] or
//! [`DeleteOutcome::Conflict`], never as an error.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod conformance;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use sqlite::SqliteObjectStore;
pub use traits::{DeleteOutcome, ListedObject, ObjectStore, PutOutcome, StoredVersion};

use async_trait::async_trait;
use vos_types::{ObjectKey, ObjectMeta, OrgId, Summary, Version};

use crate::error::StoreResult;

/// One persisted version: metadata, the exact body bytes, and the summary
/// derived from them at write time.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredVersion {
    pub meta: ObjectMeta,
    pub body: Vec<u8>,
    pub summary: Option<Summary>,
}

/// The head version of an object as returned by listing: no body.
#[derive(Clone, Debug, PartialEq)]
pub struct ListedObject {
    pub meta: ObjectMeta,
    pub summary: Option<Summary>,
}

/// Result of a conditional put.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    /// The new version is durable and is now the head.
    Committed,
    /// The expectation did not hold; nothing was written.
    Conflict {
        /// The head version observed at commit time (`None` if absent).
        current: Option<Version>,
    },
}

/// Result of a conditional delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The object and its version chain were removed.
    Deleted,
    /// The expectation did not hold; nothing was removed.
    Conflict { current: Option<Version> },
}

/// Versioned object persistence.
///
/// All implementations must satisfy these invariants:
/// - `conditional_put` and `conditional_delete` compare the caller's
///   expected head with the actual head and apply the change in one atomic
///   step. Two concurrent callers with the same expectation cannot both
///   commit.
/// - A put whose version token was already minted for the key (including
///   before a delete) is rejected as a conflict.
/// - Bodies are stored and returned byte-for-byte; the store never
///   interprets them.
/// - Every operation is scoped to one org; keys never leak across orgs.
/// - No state is cached outside the backend's own source of truth.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the head version, or a specific version when `version` is given.
    ///
    /// Returns `Ok(None)` if the object (or that version) does not exist.
    async fn get(
        &self,
        org: OrgId,
        key: &ObjectKey,
        version: Option<&Version>,
    ) -> StoreResult<Option<StoredVersion>>;

    /// The last version ever minted for the key, surviving deletes.
    async fn last_minted(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Option<Version>>;

    /// Append `record` as the new head if the current head equals `expected`
    /// (`None` meaning "no object yet").
    async fn conditional_put(
        &self,
        org: OrgId,
        expected: Option<&Version>,
        record: StoredVersion,
    ) -> StoreResult<PutOutcome>;

    /// Remove the object and its version chain if the current head equals
    /// `expected`.
    async fn conditional_delete(
        &self,
        org: OrgId,
        key: &ObjectKey,
        expected: &Version,
    ) -> StoreResult<DeleteOutcome>;

    /// Head versions of every object of `kind`, ordered by uid.
    async fn list(&self, org: OrgId, kind: &str) -> StoreResult<Vec<ListedObject>>;

    /// Metadata of every version of the object, oldest first.
    async fn history(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Vec<ObjectMeta>>;
}

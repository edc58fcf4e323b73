use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use vos_types::{ObjectKey, ObjectMeta, OrgId, Version};

use crate::error::{StoreError, StoreResult};
use crate::traits::{DeleteOutcome, ListedObject, ObjectStore, PutOutcome, StoredVersion};

type ScopedKey = (OrgId, ObjectKey);

#[derive(Default)]
struct Inner {
    /// Version chains, oldest first. A key is present only while the object exists.
    chains: BTreeMap<ScopedKey, Vec<StoredVersion>>,
    /// Last minted version per key, kept across deletes.
    minted: HashMap<ScopedKey, Version>,
}

/// In-memory, map-based object store.
///
/// Intended for tests and embedding. Everything lives behind one `RwLock`,
/// so each conditional operation checks and applies under a single write
/// guard with no await point in between. Data is lost when the store is
/// dropped.
pub struct InMemoryObjectStore {
    inner: RwLock<Inner>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of live objects across all orgs.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.chains.len())
    }

    /// Returns `true` if no objects are stored.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(
        &self,
        org: OrgId,
        key: &ObjectKey,
        version: Option<&Version>,
    ) -> StoreResult<Option<StoredVersion>> {
        let inner = self.read()?;
        let Some(chain) = inner.chains.get(&(org, key.clone())) else {
            return Ok(None);
        };
        let found = match version {
            None => chain.last(),
            Some(v) => chain.iter().find(|sv| &sv.meta.version == v),
        };
        Ok(found.cloned())
    }

    async fn last_minted(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Option<Version>> {
        let inner = self.read()?;
        Ok(inner.minted.get(&(org, key.clone())).cloned())
    }

    async fn conditional_put(
        &self,
        org: OrgId,
        expected: Option<&Version>,
        record: StoredVersion,
    ) -> StoreResult<PutOutcome> {
        let scoped = (org, record.meta.key.clone());
        let mut inner = self.write()?;

        let current = inner
            .chains
            .get(&scoped)
            .and_then(|chain| chain.last())
            .map(|sv| sv.meta.version.clone());
        if current.as_ref() != expected {
            return Ok(PutOutcome::Conflict { current });
        }

        let reused = inner
            .minted
            .get(&scoped)
            .is_some_and(|last| !record.meta.version.supersedes(last))
            || inner
                .chains
                .get(&scoped)
                .is_some_and(|chain| chain.iter().any(|sv| sv.meta.version == record.meta.version));
        if reused {
            return Ok(PutOutcome::Conflict { current });
        }

        inner
            .minted
            .insert(scoped.clone(), record.meta.version.clone());
        inner.chains.entry(scoped).or_default().push(record);
        Ok(PutOutcome::Committed)
    }

    async fn conditional_delete(
        &self,
        org: OrgId,
        key: &ObjectKey,
        expected: &Version,
    ) -> StoreResult<DeleteOutcome> {
        let scoped = (org, key.clone());
        let mut inner = self.write()?;

        let current = inner
            .chains
            .get(&scoped)
            .and_then(|chain| chain.last())
            .map(|sv| sv.meta.version.clone());
        if current.as_ref() != Some(expected) {
            return Ok(DeleteOutcome::Conflict { current });
        }
        inner.chains.remove(&scoped);
        Ok(DeleteOutcome::Deleted)
    }

    async fn list(&self, org: OrgId, kind: &str) -> StoreResult<Vec<ListedObject>> {
        let inner = self.read()?;
        Ok(inner
            .chains
            .iter()
            .filter(|((o, key), _)| *o == org && key.kind == kind)
            .filter_map(|(_, chain)| chain.last())
            .map(|head| ListedObject {
                meta: head.meta.clone(),
                summary: head.summary.clone(),
            })
            .collect())
    }

    async fn history(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Vec<ObjectMeta>> {
        let inner = self.read()?;
        Ok(inner
            .chains
            .get(&(org, key.clone()))
            .map(|chain| chain.iter().map(|sv| sv.meta.clone()).collect())
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("InMemoryObjectStore");
        match self.len() {
            Ok(count) => d.field("object_count", &count),
            Err(_) => d.field("object_count", &"<poisoned>"),
        };
        d.finish()
    }
}

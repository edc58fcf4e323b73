//! SQLite implementation of [`ObjectStore`].
//!
//! Uses rusqlite with bundled SQLite. Every call runs on the blocking pool
//! via `tokio::task::spawn_blocking`, and each conditional operation is one
//! `IMMEDIATE` transaction, so the head check and the write cannot be
//! interleaved with another writer.
//!
//! A call whose future is dropped after its transaction was handed to the
//! blocking pool may still commit. A client retrying such a write sees a
//! conflict rather than a duplicate version.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use vos_types::{
    ContentHash, ObjectKey, ObjectMeta, OrgId, Summary, Timestamp, UserInfo, Version,
};

use crate::error::{StoreError, StoreResult};
use crate::migration;
use crate::traits::{DeleteOutcome, ListedObject, ObjectStore, PutOutcome, StoredVersion};

const META_COLUMNS: &str = "kind, uid, version, created, modified, \
     created_by_id, created_by_login, modified_by_id, modified_by_login, \
     comment, etag, size, summary";

/// SQLite-backed object store.
pub struct SqliteObjectStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteObjectStore {
    /// Open (creating if needed) a database file and run migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> StoreResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("connection mutex poisoned: {e}")))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

impl std::fmt::Debug for SqliteObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteObjectStore").finish_non_exhaustive()
    }
}

/// Raw column values of one `object_version` row, before validation.
struct MetaRow {
    kind: String,
    uid: String,
    version: String,
    created: i64,
    modified: i64,
    created_by: UserInfo,
    modified_by: UserInfo,
    comment: Option<String>,
    etag: String,
    size: i64,
    summary: Option<String>,
}

impl MetaRow {
    /// Reads the columns listed in [`META_COLUMNS`], in order.
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get(0)?,
            uid: row.get(1)?,
            version: row.get(2)?,
            created: row.get(3)?,
            modified: row.get(4)?,
            created_by: UserInfo {
                id: row.get(5)?,
                login: row.get(6)?,
            },
            modified_by: UserInfo {
                id: row.get(7)?,
                login: row.get(8)?,
            },
            comment: row.get(9)?,
            etag: row.get(10)?,
            size: row.get(11)?,
            summary: row.get(12)?,
        })
    }

    fn decode(self) -> StoreResult<(ObjectMeta, Option<Summary>)> {
        let key = ObjectKey::new(self.kind, self.uid);
        let corrupt = |reason: String| StoreError::Corrupt {
            key: key.to_string(),
            reason,
        };
        let version = Version::parse(&self.version).map_err(|e| corrupt(e.to_string()))?;
        let etag = ContentHash::from_hex(&self.etag).map_err(|e| corrupt(e.to_string()))?;
        let size = u64::try_from(self.size).map_err(|_| corrupt(format!("negative size {}", self.size)))?;
        let summary = self
            .summary
            .map(|s| serde_json::from_str::<Summary>(&s))
            .transpose()
            .map_err(|e| corrupt(format!("summary: {e}")))?;
        let meta = ObjectMeta {
            key,
            version,
            created: Timestamp::from_millis(self.created),
            modified: Timestamp::from_millis(self.modified),
            created_by: self.created_by,
            modified_by: self.modified_by,
            comment: self.comment,
            etag,
            size,
        };
        Ok((meta, summary))
    }
}

fn parse_current(key: &ObjectKey, current: Option<String>) -> StoreResult<Option<Version>> {
    current
        .map(|v| {
            Version::parse(&v).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: format!("stored version: {e}"),
            })
        })
        .transpose()
}

fn head_version(
    conn: &Connection,
    org: OrgId,
    key: &ObjectKey,
) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT version FROM object_head WHERE org_id = ?1 AND kind = ?2 AND uid = ?3",
        params![org.0, key.kind, key.uid],
        |row| row.get(0),
    )
    .optional()
}

#[async_trait]
impl ObjectStore for SqliteObjectStore {
    async fn get(
        &self,
        org: OrgId,
        key: &ObjectKey,
        version: Option<&Version>,
    ) -> StoreResult<Option<StoredVersion>> {
        let key = key.clone();
        let version = version.cloned();
        self.run(move |conn| {
            let Some(head) = head_version(conn, org, &key)? else {
                return Ok(None);
            };
            let wanted = version.map(|v| v.as_str().to_string()).unwrap_or(head);
            let sql = format!(
                "SELECT {META_COLUMNS}, body FROM object_version
                 WHERE org_id = ?1 AND kind = ?2 AND uid = ?3 AND version = ?4"
            );
            let row = conn
                .query_row(&sql, params![org.0, key.kind, key.uid, wanted], |row| {
                    Ok((MetaRow::from_row(row)?, row.get::<_, Vec<u8>>(13)?))
                })
                .optional()?;
            let Some((meta_row, body)) = row else {
                return Ok(None);
            };
            let (meta, summary) = meta_row.decode()?;
            Ok(Some(StoredVersion {
                meta,
                body,
                summary,
            }))
        })
        .await
    }

    async fn last_minted(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Option<Version>> {
        let key = key.clone();
        self.run(move |conn| {
            let mark: Option<String> = conn
                .query_row(
                    "SELECT last_version FROM object_version_mark
                     WHERE org_id = ?1 AND kind = ?2 AND uid = ?3",
                    params![org.0, key.kind, key.uid],
                    |row| row.get(0),
                )
                .optional()?;
            parse_current(&key, mark)
        })
        .await
    }

    async fn conditional_put(
        &self,
        org: OrgId,
        expected: Option<&Version>,
        record: StoredVersion,
    ) -> StoreResult<PutOutcome> {
        let expected = expected.cloned();
        let summary = record
            .summary
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.run(move |conn| {
            let meta = &record.meta;
            let key = &meta.key;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current = head_version(&tx, org, key)?;
            if current.as_deref() != expected.as_ref().map(Version::as_str) {
                return Ok(PutOutcome::Conflict {
                    current: parse_current(key, current)?,
                });
            }

            let minted: Option<String> = tx
                .query_row(
                    "SELECT last_version FROM object_version_mark
                     WHERE org_id = ?1 AND kind = ?2 AND uid = ?3",
                    params![org.0, key.kind, key.uid],
                    |row| row.get(0),
                )
                .optional()?;
            let in_chain: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM object_version
                 WHERE org_id = ?1 AND kind = ?2 AND uid = ?3 AND version = ?4)",
                params![org.0, key.kind, key.uid, meta.version.as_str()],
                |row| row.get(0),
            )?;
            let minted = parse_current(key, minted)?;
            let below_mark = minted
                .as_ref()
                .is_some_and(|last| !meta.version.supersedes(last));
            if in_chain || below_mark {
                return Ok(PutOutcome::Conflict {
                    current: parse_current(key, current)?,
                });
            }

            tx.execute(
                "INSERT INTO object_version (
                    org_id, kind, uid, version, created, modified,
                    created_by_id, created_by_login, modified_by_id, modified_by_login,
                    comment, etag, size, body, summary
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    org.0,
                    key.kind,
                    key.uid,
                    meta.version.as_str(),
                    meta.created.as_millis(),
                    meta.modified.as_millis(),
                    meta.created_by.id,
                    meta.created_by.login,
                    meta.modified_by.id,
                    meta.modified_by.login,
                    meta.comment,
                    meta.etag.to_hex(),
                    meta.size as i64,
                    record.body,
                    summary,
                ],
            )?;
            tx.execute(
                "INSERT INTO object_head (org_id, kind, uid, version) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(org_id, kind, uid) DO UPDATE SET version = excluded.version",
                params![org.0, key.kind, key.uid, meta.version.as_str()],
            )?;
            tx.execute(
                "INSERT INTO object_version_mark (org_id, kind, uid, last_version)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(org_id, kind, uid) DO UPDATE SET last_version = excluded.last_version",
                params![org.0, key.kind, key.uid, meta.version.as_str()],
            )?;
            tx.commit()?;
            Ok(PutOutcome::Committed)
        })
        .await
    }

    async fn conditional_delete(
        &self,
        org: OrgId,
        key: &ObjectKey,
        expected: &Version,
    ) -> StoreResult<DeleteOutcome> {
        let key = key.clone();
        let expected = expected.clone();
        self.run(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = head_version(&tx, org, &key)?;
            if current.as_deref() != Some(expected.as_str()) {
                return Ok(DeleteOutcome::Conflict {
                    current: parse_current(&key, current)?,
                });
            }
            tx.execute(
                "DELETE FROM object_version WHERE org_id = ?1 AND kind = ?2 AND uid = ?3",
                params![org.0, key.kind, key.uid],
            )?;
            tx.execute(
                "DELETE FROM object_head WHERE org_id = ?1 AND kind = ?2 AND uid = ?3",
                params![org.0, key.kind, key.uid],
            )?;
            tx.commit()?;
            Ok(DeleteOutcome::Deleted)
        })
        .await
    }

    async fn list(&self, org: OrgId, kind: &str) -> StoreResult<Vec<ListedObject>> {
        let kind = kind.to_string();
        self.run(move |conn| {
            let sql = format!(
                "SELECT {} FROM object_head h
                 JOIN object_version v
                   ON v.org_id = h.org_id AND v.kind = h.kind
                  AND v.uid = h.uid AND v.version = h.version
                 WHERE h.org_id = ?1 AND h.kind = ?2
                 ORDER BY h.uid",
                prefixed_meta_columns("v")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![org.0, kind], MetaRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|r| {
                    let (meta, summary) = r.decode()?;
                    Ok::<_, StoreError>(ListedObject { meta, summary })
                })
                .collect()
        })
        .await
    }

    async fn history(&self, org: OrgId, key: &ObjectKey) -> StoreResult<Vec<ObjectMeta>> {
        let key = key.clone();
        self.run(move |conn| {
            let sql = format!(
                "SELECT {META_COLUMNS} FROM object_version
                 WHERE org_id = ?1 AND kind = ?2 AND uid = ?3
                 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![org.0, key.kind, key.uid], MetaRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|r| r.decode().map(|(meta, _)| meta))
                .collect()
        })
        .await
    }
}

fn prefixed_meta_columns(alias: &str) -> String {
    META_COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

//! SQLite schema migrations.
//!
//! Each migration moves the schema from version N to N+1 and is recorded in
//! `schema_migrations`, so opening an existing database is idempotent.

use rusqlite::Connection;
use vos_types::Timestamp;

use crate::error::{StoreError, StoreResult};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
pub fn migrate(conn: &mut Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {current} is newer than supported version {CURRENT_VERSION}"
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;
        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;
            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, Timestamp::now().as_millis()],
            )?;
        }
        tx.commit()?;
        tracing::info!(from = current, to = CURRENT_VERSION, "migrated object store schema");
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> StoreResult<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: version chains, heads, and minted-version marks.
fn apply_v1(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        -- Every retained version of every live object.
        CREATE TABLE object_version (
            id INTEGER PRIMARY KEY AUTOINCREMENT,   -- insertion order, oldest first
            org_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            uid TEXT NOT NULL,
            version TEXT NOT NULL,
            created INTEGER NOT NULL,               -- Unix ms
            modified INTEGER NOT NULL,              -- Unix ms
            created_by_id INTEGER NOT NULL,
            created_by_login TEXT NOT NULL,
            modified_by_id INTEGER NOT NULL,
            modified_by_login TEXT NOT NULL,
            comment TEXT,
            etag TEXT NOT NULL,                     -- hex BLAKE3 of body
            size INTEGER NOT NULL,
            body BLOB NOT NULL,
            summary TEXT,                           -- JSON, nullable

            UNIQUE(org_id, kind, uid, version)
        );

        -- Current head per live object.
        CREATE TABLE object_head (
            org_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            uid TEXT NOT NULL,
            version TEXT NOT NULL,
            PRIMARY KEY (org_id, kind, uid)
        );

        -- Last minted version per key; survives deletes.
        CREATE TABLE object_version_mark (
            org_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            uid TEXT NOT NULL,
            last_version TEXT NOT NULL,
            PRIMARY KEY (org_id, kind, uid)
        );

        CREATE INDEX idx_object_version_key ON object_version(org_id, kind, uid, id);
        CREATE INDEX idx_object_head_kind ON object_head(org_id, kind, uid);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for table in ["object_head", "object_version", "object_version_mark", "schema_migrations"] {
            assert!(tables.iter().any(|t| t == table), "missing {table}");
        }
    }

    #[test]
    fn migration_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (99, 0)",
            [],
        )
        .unwrap();
        assert!(matches!(migrate(&mut conn), Err(StoreError::Migration(_))));
    }
}

use std::path::Path;

use contracts::SessionSnapshot;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("sqlite store is not attached")]
    NotAttached,
    #[error("session `{session_id}` was stored as schema {stored}, expected {expected}")]
    SchemaMismatch {
        session_id: String,
        stored: String,
        expected: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSessionSummary {
    pub session_id: String,
    pub schema_version: String,
    pub age: u32,
    pub event_count: usize,
    pub revision: u64,
}

/// Key-value store of session snapshot blobs keyed by session id.
#[derive(Debug)]
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Serializes and upserts the snapshot, bumping the session revision.
    pub fn put_snapshot(
        &mut self,
        session_id: &str,
        schema_version: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<u64, PersistenceError> {
        let payload_json = serde_json::to_string(snapshot)?;
        self.put_raw(
            session_id,
            schema_version,
            &payload_json,
            snapshot.events.age,
            snapshot.events.history.len(),
        )
    }

    fn put_raw(
        &mut self,
        session_id: &str,
        schema_version: &str,
        payload_json: &str,
        age: u32,
        event_count: usize,
    ) -> Result<u64, PersistenceError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO session_blobs (
                session_id,
                schema_version,
                payload_json,
                age,
                event_count,
                revision
             ) VALUES (?1, ?2, ?3, ?4, ?5, 1)
             ON CONFLICT(session_id) DO UPDATE SET
                schema_version = excluded.schema_version,
                payload_json = excluded.payload_json,
                age = excluded.age,
                event_count = excluded.event_count,
                revision = session_blobs.revision + 1",
            params![
                session_id,
                schema_version,
                payload_json,
                i64::from(age),
                i64::try_from(event_count).unwrap_or(i64::MAX),
            ],
        )?;
        let revision: i64 = tx.query_row(
            "SELECT revision FROM session_blobs WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(u64::try_from(revision).unwrap_or_default())
    }

    /// The stored payload exactly as written.
    pub fn load_raw(&self, session_id: &str) -> Result<Option<String>, PersistenceError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload_json FROM session_blobs WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    pub fn load_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionSnapshot>, PersistenceError> {
        match self.load_raw(session_id)? {
            Some(raw) => Ok(Some(serde_json::from_str::<SessionSnapshot>(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn stored_schema_version(
        &self,
        session_id: &str,
    ) -> Result<Option<String>, PersistenceError> {
        let version = self
            .conn
            .query_row(
                "SELECT schema_version FROM session_blobs WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    pub fn session_exists(&self, session_id: &str) -> Result<bool, PersistenceError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM session_blobs WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(exists.is_some())
    }

    pub fn delete_session(&mut self, session_id: &str) -> Result<bool, PersistenceError> {
        let removed = self.conn.execute(
            "DELETE FROM session_blobs WHERE session_id = ?1",
            params![session_id],
        )?;
        Ok(removed > 0)
    }

    pub fn list_sessions(&self) -> Result<Vec<PersistedSessionSummary>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, schema_version, age, event_count, revision
             FROM session_blobs
             ORDER BY session_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PersistedSessionSummary {
                session_id: row.get(0)?,
                schema_version: row.get(1)?,
                age: u32::try_from(row.get::<_, i64>(2)?).unwrap_or_default(),
                event_count: usize::try_from(row.get::<_, i64>(3)?).unwrap_or_default(),
                revision: u64::try_from(row.get::<_, i64>(4)?).unwrap_or_default(),
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    fn configure(&mut self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS session_blobs (
                session_id TEXT PRIMARY KEY,
                schema_version TEXT NOT NULL,
                payload_json TEXT NOT NULL,
                age INTEGER NOT NULL,
                event_count INTEGER NOT NULL,
                revision INTEGER NOT NULL
            );
            ",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name)
             VALUES(1, 'session_blobs_v1')",
            [],
        )?;

        Ok(())
    }
}

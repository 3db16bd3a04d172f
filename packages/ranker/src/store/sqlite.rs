//! SQLite-backed state store
//!
//! Keeps the serialized snapshot in a single-row table. Every save replaces
//! that row inside a transaction, so a crash leaves either the old or the
//! new snapshot.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{Snapshot, StateStore, StoreError, StoreResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ranking_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

pub struct SqliteStore {
    connection: Mutex<Connection>,
    db_path: String,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        let connection = Connection::open(&db_path)?;

        // journal_mode answers with the mode actually set
        let journal_mode: String =
            connection.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        connection.pragma_update(None, "synchronous", "NORMAL")?;
        connection.execute_batch(SCHEMA)?;

        tracing::debug!(path = %path_str, %journal_mode, "sqlite store opened");
        Ok(Self {
            connection: Mutex::new(connection),
            db_path: path_str,
        })
    }

    /// In-memory database (tests)
    pub fn in_memory() -> StoreResult<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;

        Ok(Self {
            connection: Mutex::new(connection),
            db_path: ":memory:".to_string(),
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

impl StateStore for SqliteStore {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        let conn = self.lock()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM ranking_state WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        let mut conn = self.lock()?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO ranking_state (id, payload, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![payload, snapshot.last_updated.to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::debug!(path = %self.db_path, items = snapshot.items.len(), "state saved");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM ranking_state", [])?;
        Ok(())
    }
}

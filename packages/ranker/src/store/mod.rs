//! Durable state storage
//!
//! The whole ranking state is saved as one snapshot and replaced atomically:
//! - `json_file` - pretty JSON file, written to a temp file then renamed
//! - `sqlite` - single-row SQLite table, replaced inside a transaction
//! - `memory` - in-process store for tests and embedding

// ============================================================
// Submodules
// ============================================================

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use memorank_algo::{EngineResult, Item, Mode, Population, Session};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// Error types
// ============================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock acquisition failed: {0}")]
    LockError(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================
// Snapshot
// ============================================================

/// Complete persisted state of a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub total_judgments: u64,
    pub last_updated: DateTime<Utc>,
    /// Absent in blobs written before mode switching existed
    #[serde(default)]
    pub mode: Mode,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        Self {
            items: session.population().items().to_vec(),
            total_judgments: session.total_judgments(),
            last_updated: Utc::now(),
            mode: session.mode(),
        }
    }

    /// Validate the records and resume a session from them
    pub fn into_session(self) -> EngineResult<Session> {
        let population = Population::from_items(self.items)?;
        Ok(Session::restore(population, self.total_judgments, self.mode))
    }
}

// ============================================================
// StateStore
// ============================================================

/// Whole-state load/save. `load` returns `None` on first run.
pub trait StateStore {
    fn load(&self) -> StoreResult<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Discard persisted state; clearing an empty store succeeds
    fn clear(&self) -> StoreResult<()>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

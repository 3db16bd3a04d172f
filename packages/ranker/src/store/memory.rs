use std::sync::Mutex;

use super::{Snapshot, StateStore, StoreError, StoreResult};

/// Keeps the serialized snapshot in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|count| *count).unwrap_or(0)
    }
}

fn lock_error<T>(err: std::sync::PoisonError<T>) -> StoreError {
    StoreError::LockError(err.to_string())
}

impl StateStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        let blob = self.blob.lock().map_err(lock_error)?;
        match blob.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let raw = serde_json::to_string(snapshot)?;
        *self.blob.lock().map_err(lock_error)? = Some(raw);
        *self.saves.lock().map_err(lock_error)? += 1;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.blob.lock().map_err(lock_error)? = None;
        Ok(())
    }
}

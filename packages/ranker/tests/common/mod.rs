#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use memorank::{CatalogError, CatalogLoader, Snapshot, StateStore, StaticCatalog, StoreError};
use memorank_algo::CatalogEntry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn catalog(n: u32) -> StaticCatalog {
    StaticCatalog::new(
        (1..=n)
            .map(|id| CatalogEntry::new(id, format!("item-{id}"), id))
            .collect(),
    )
}

pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(20240501)
}

/// Store that accepts reads but fails every write
pub struct FailingStore;

impl StateStore for FailingStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(None)
    }

    fn save(&self, _snapshot: &Snapshot) -> Result<(), StoreError> {
        Err(StoreError::LockError("store offline".to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::LockError("store offline".to_string()))
    }
}

/// Catalog that can be taken offline mid-run
pub struct SwitchableCatalog {
    inner: StaticCatalog,
    offline: AtomicBool,
}

impl SwitchableCatalog {
    pub fn new(n: u32) -> Self {
        Self {
            inner: catalog(n),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl CatalogLoader for SwitchableCatalog {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Io {
                path: PathBuf::from("catalog.json"),
                source: io::Error::new(io::ErrorKind::NotFound, "catalog offline"),
            });
        }
        self.inner.load_catalog()
    }
}

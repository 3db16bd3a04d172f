//! memorank - persistent memorability ranking runs
//!
//! Wires the rating engine from `memorank-algo` to a catalog loader and a
//! durable state store.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod ranker;
pub mod store;

pub use catalog::{CatalogError, CatalogLoader, JsonCatalog, StaticCatalog};
pub use config::{Config, StoreBackend};
pub use ranker::{Ranker, RankerError, RankerResult};
pub use store::{JsonFileStore, MemoryStore, Snapshot, SqliteStore, StateStore, StoreError};

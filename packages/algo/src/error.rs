//! Error types for the rating engine

use thiserror::Error;

use crate::types::ItemId;

/// Errors reported synchronously by engine operations.
///
/// No variant is ever produced after a partial mutation: validation runs
/// before any rating record is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Population smaller than the requested sample
    #[error("insufficient population: need {required} items, have {available}")]
    InsufficientPopulation { required: usize, available: usize },

    /// Judgment does not fit the pending comparison
    #[error("invalid judgment: {0}")]
    InvalidJudgment(String),

    #[error("unknown item id {0}")]
    UnknownItem(ItemId),

    #[error("duplicate item id {0}")]
    DuplicateItem(ItemId),

    #[error("catalog is empty")]
    EmptyCatalog,

    /// Persisted records violate a population invariant
    #[error("corrupt state: {0}")]
    CorruptState(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

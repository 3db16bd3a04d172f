//! Data Sanitization
//!
//! Validation of catalog rows and persisted records before they become a
//! population, plus a health report for an existing set of records.
//!
//! Functions:
//! - Catalog validation (non-empty, unique ids)
//! - Record validation (unique ids, `matches == wins + losses`)
//! - Population health diagnostics

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{CatalogEntry, Item, ItemId};

/// Health report for a set of rating records
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub is_healthy: bool,
    pub item_count: usize,
    pub duplicate_ids: Vec<ItemId>,
    /// Items whose `matches` differs from `wins + losses`
    pub inconsistent_counters: Vec<ItemId>,
    pub message: String,
}

/// First id that appears more than once
pub fn find_duplicate_id<I>(ids: I) -> Option<ItemId>
where
    I: IntoIterator<Item = ItemId>,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

pub fn counters_consistent(item: &Item) -> bool {
    u64::from(item.matches()) == u64::from(item.wins()) + u64::from(item.losses())
}

/// Catalog must be non-empty and id-unique
pub fn validate_catalog(entries: &[CatalogEntry]) -> EngineResult<()> {
    if entries.is_empty() {
        return Err(EngineError::EmptyCatalog);
    }
    if let Some(id) = find_duplicate_id(entries.iter().map(|entry| entry.id)) {
        return Err(EngineError::DuplicateItem(id));
    }
    Ok(())
}

/// Persisted records must pass [`diagnose_items`]; nothing is repaired
pub fn validate_items(items: &[Item]) -> EngineResult<()> {
    let report = diagnose_items(items);
    if report.is_healthy {
        Ok(())
    } else {
        Err(EngineError::CorruptState(report.message))
    }
}

/// Inspect records for invariant violations
pub fn diagnose_items(items: &[Item]) -> DiagnosticResult {
    let mut seen = HashSet::new();
    let mut duplicate_ids = Vec::new();
    let mut inconsistent_counters = Vec::new();

    for item in items {
        if !seen.insert(item.id) && !duplicate_ids.contains(&item.id) {
            duplicate_ids.push(item.id);
        }
        if !counters_consistent(item) {
            inconsistent_counters.push(item.id);
        }
    }

    let message = if items.is_empty() {
        "Population is empty".to_string()
    } else if !duplicate_ids.is_empty() {
        format!("Population contains duplicate ids: {duplicate_ids:?}")
    } else if !inconsistent_counters.is_empty() {
        format!("Match counters disagree with wins + losses for ids: {inconsistent_counters:?}")
    } else {
        "Population is healthy".to_string()
    };

    DiagnosticResult {
        is_healthy: !items.is_empty() && duplicate_ids.is_empty() && inconsistent_counters.is_empty(),
        item_count: items.len(),
        duplicate_ids,
        inconsistent_counters,
        message,
    }
}

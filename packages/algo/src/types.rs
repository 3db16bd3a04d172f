//! Common Types and Constants
//!
//! Item records and the fixed population the rating engine works over.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::sanitize;

// ==================== Constants ====================

/// Rating every item starts from
pub const INITIAL_RATING: i32 = 1500;

/// Stable identifier of a population member
pub type ItemId = u32;

// ==================== Catalog Types ====================

/// One catalog row as supplied by the catalog loader.
///
/// Descriptive fields are opaque to the engine; only `id` matters for ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: ItemId,
    pub display_name: String,
    pub ordinal: u32,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: ItemId, display_name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            ordinal,
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}

// ==================== Item ====================

/// Rating record for a single population member.
///
/// Counters are only mutated through [`crate::elo::apply`], which keeps
/// `matches == wins + losses`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub display_name: String,
    pub ordinal: u32,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub(crate) rating: i32,
    pub(crate) wins: u32,
    pub(crate) losses: u32,
    pub(crate) matches: u32,
}

impl Item {
    /// Fresh record at [`INITIAL_RATING`] with zeroed counters
    pub fn new(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            display_name: entry.display_name,
            ordinal: entry.ordinal,
            image_ref: entry.image_ref,
            rating: INITIAL_RATING,
            wins: 0,
            losses: 0,
            matches: 0,
        }
    }

    /// Seed a non-default prior rating (counters untouched)
    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = rating;
        self
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }
}

// ==================== Population ====================

/// The closed set of items being ranked.
///
/// Ids are unique and the set never changes after construction.
#[derive(Clone, Debug)]
pub struct Population {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Population {
    /// Build a fresh population from catalog rows
    pub fn from_catalog(entries: Vec<CatalogEntry>) -> EngineResult<Self> {
        sanitize::validate_catalog(&entries)?;
        Ok(Self::index_items(entries.into_iter().map(Item::new).collect()))
    }

    /// Rebuild a population from previously persisted records
    pub fn from_items(items: Vec<Item>) -> EngineResult<Self> {
        sanitize::validate_items(&items)?;
        Ok(Self::index_items(items))
    }

    fn index_items(items: Vec<Item>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id, idx))
            .collect();
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Two distinct records borrowed mutably at once
    pub(crate) fn pair_mut(
        &mut self,
        first: ItemId,
        second: ItemId,
    ) -> EngineResult<(&mut Item, &mut Item)> {
        if first == second {
            return Err(EngineError::InvalidJudgment(format!(
                "item {first} cannot be compared with itself"
            )));
        }
        let i = *self.index.get(&first).ok_or(EngineError::UnknownItem(first))?;
        let j = *self.index.get(&second).ok_or(EngineError::UnknownItem(second))?;

        if i < j {
            let (head, tail) = self.items.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.items.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: u32) -> Vec<CatalogEntry> {
        (1..=n)
            .map(|id| CatalogEntry::new(id, format!("item-{id}"), id))
            .collect()
    }

    #[test]
    fn test_from_catalog_initializes_records() {
        let population = Population::from_catalog(catalog(3)).unwrap();
        assert_eq!(population.len(), 3);
        for item in population.items() {
            assert_eq!(item.rating(), INITIAL_RATING);
            assert_eq!(item.wins(), 0);
            assert_eq!(item.losses(), 0);
            assert_eq!(item.matches(), 0);
        }
    }

    #[test]
    fn test_from_catalog_rejects_duplicates() {
        let mut entries = catalog(3);
        entries.push(CatalogEntry::new(2, "again", 99));
        let err = Population::from_catalog(entries).unwrap_err();
        assert_eq!(err, EngineError::DuplicateItem(2));
    }

    #[test]
    fn test_from_catalog_rejects_empty() {
        let err = Population::from_catalog(Vec::new()).unwrap_err();
        assert_eq!(err, EngineError::EmptyCatalog);
    }

    #[test]
    fn test_get_by_id() {
        let population = Population::from_catalog(catalog(4)).unwrap();
        assert_eq!(population.get(3).map(|i| i.display_name.as_str()), Some("item-3"));
        assert!(population.get(42).is_none());
        assert!(population.contains(1));
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut population = Population::from_catalog(catalog(4)).unwrap();
        let (a, b) = population.pair_mut(4, 1).unwrap();
        assert_eq!((a.id, b.id), (4, 1));
        let (a, b) = population.pair_mut(1, 4).unwrap();
        assert_eq!((a.id, b.id), (1, 4));
    }

    #[test]
    fn test_pair_mut_rejects_same_and_unknown() {
        let mut population = Population::from_catalog(catalog(2)).unwrap();
        assert!(matches!(
            population.pair_mut(1, 1),
            Err(EngineError::InvalidJudgment(_))
        ));
        assert_eq!(
            population.pair_mut(1, 9).unwrap_err(),
            EngineError::UnknownItem(9)
        );
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = Item::new(CatalogEntry::new(7, "seven", 7).with_image("img/7.png"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["displayName"], "seven");
        assert_eq!(json["imageRef"], "img/7.png");
        assert_eq!(json["rating"], 1500);
    }
}

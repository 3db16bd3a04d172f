//! Ranking queries and population summary.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Item, Population};

/// Column a ranking listing is ordered by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest rating first
    #[default]
    Rating,
    Wins,
    Losses,
    Matches,
    /// Alphabetical by display name, ignoring case
    Name,
    /// Ascending catalog ordinal
    Ordinal,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rating" => Some(SortKey::Rating),
            "wins" => Some(SortKey::Wins),
            "losses" => Some(SortKey::Losses),
            "matches" => Some(SortKey::Matches),
            "name" => Some(SortKey::Name),
            "ordinal" | "number" => Some(SortKey::Ordinal),
            _ => None,
        }
    }

    fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Rating => b.rating().cmp(&a.rating()),
            SortKey::Wins => b.wins().cmp(&a.wins()),
            SortKey::Losses => b.losses().cmp(&a.losses()),
            SortKey::Matches => b.matches().cmp(&a.matches()),
            SortKey::Name => a
                .display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name)),
            SortKey::Ordinal => a.ordinal.cmp(&b.ordinal),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankingQuery {
    /// Case-insensitive match on display name, or digits of the ordinal
    pub search: Option<String>,
    pub sort: SortKey,
}

impl RankingQuery {
    fn matches(&self, item: &Item) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                item.display_name.to_lowercase().contains(&term.to_lowercase())
                    || item.ordinal.to_string().contains(term)
            }
        }
    }
}

/// One row of a ranking listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedEntry<'a> {
    /// 1-based position within the listing
    pub position: usize,
    pub item: &'a Item,
}

/// Filter and order the population. Ties keep population order.
pub fn rankings<'a>(population: &'a Population, query: &RankingQuery) -> Vec<RankedEntry<'a>> {
    let mut listed: Vec<&Item> = population
        .items()
        .iter()
        .filter(|item| query.matches(item))
        .collect();
    listed.sort_by(|a, b| query.sort.compare(a, b));

    listed
        .into_iter()
        .enumerate()
        .map(|(idx, item)| RankedEntry {
            position: idx + 1,
            item,
        })
        .collect()
}

/// Headline numbers for a ranking run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<'a> {
    pub population: usize,
    pub total_judgments: u64,
    /// Lowest-rated item; `None` until the first judgment
    pub least_memorable: Option<&'a Item>,
    /// `(lowest, highest)` rating; `None` until the first judgment
    pub rating_range: Option<(i32, i32)>,
}

impl Summary<'_> {
    pub fn spread(&self) -> Option<i32> {
        self.rating_range.map(|(low, high)| high - low)
    }
}

pub fn summary(population: &Population, total_judgments: u64) -> Summary<'_> {
    let (least_memorable, rating_range) = if total_judgments == 0 {
        (None, None)
    } else {
        // min_by_key keeps the first of equal ratings
        let lowest = population.items().iter().min_by_key(|item| item.rating());
        let highest = population.items().iter().map(Item::rating).max();
        let range = lowest.zip(highest).map(|(low, high)| (low.rating(), high));
        (lowest, range)
    };

    Summary {
        population: population.len(),
        total_judgments,
        least_memorable,
        rating_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogEntry, ItemId};

    fn population() -> Population {
        let rows = [
            (1, "bulbasaur", 1, 1510),
            (4, "charmander", 4, 1490),
            (7, "squirtle", 7, 1530),
            (25, "pikachu", 25, 1480),
            (132, "ditto", 132, 1530),
        ];
        let items = rows
            .iter()
            .map(|&(id, name, ordinal, rating)| {
                Item::new(CatalogEntry::new(id, name, ordinal)).with_rating(rating)
            })
            .collect();
        Population::from_items(items).unwrap()
    }

    fn ids(entries: &[RankedEntry<'_>]) -> Vec<ItemId> {
        entries.iter().map(|e| e.item.id).collect()
    }

    #[test]
    fn test_rankings_by_rating_desc_stable() {
        let pop = population();
        let listed = rankings(&pop, &RankingQuery::default());
        assert_eq!(ids(&listed), vec![7, 132, 1, 4, 25]);
        assert_eq!(listed[0].position, 1);
        assert_eq!(listed[4].position, 5);
    }

    #[test]
    fn test_rankings_by_name_and_ordinal() {
        let pop = population();
        let by_name = rankings(&pop, &RankingQuery { search: None, sort: SortKey::Name });
        assert_eq!(ids(&by_name), vec![1, 4, 132, 25, 7]);

        let by_ordinal = rankings(&pop, &RankingQuery { search: None, sort: SortKey::Ordinal });
        assert_eq!(ids(&by_ordinal), vec![1, 4, 7, 25, 132]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let items = [(1, "Zubat"), (2, "abra"), (3, "Abra"), (4, "mew")]
            .iter()
            .map(|&(id, name)| Item::new(CatalogEntry::new(id, name, id)))
            .collect();
        let pop = Population::from_items(items).unwrap();

        let by_name = rankings(&pop, &RankingQuery { search: None, sort: SortKey::Name });
        assert_eq!(ids(&by_name), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_search_by_name_case_insensitive() {
        let pop = population();
        let query = RankingQuery { search: Some("CHAR".to_string()), sort: SortKey::Rating };
        assert_eq!(ids(&rankings(&pop, &query)), vec![4]);
    }

    #[test]
    fn test_search_by_ordinal_digits() {
        let pop = population();
        let query = RankingQuery { search: Some("2".to_string()), sort: SortKey::Ordinal };
        assert_eq!(ids(&rankings(&pop, &query)), vec![25, 132]);
    }

    #[test]
    fn test_search_without_hits() {
        let pop = population();
        let query = RankingQuery { search: Some("mew".to_string()), sort: SortKey::Rating };
        assert!(rankings(&pop, &query).is_empty());
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!(SortKey::from_str("Wins"), Some(SortKey::Wins));
        assert_eq!(SortKey::from_str("number"), Some(SortKey::Ordinal));
        assert_eq!(SortKey::from_str("elo"), None);
    }

    #[test]
    fn test_summary_before_first_judgment() {
        let pop = population();
        let s = summary(&pop, 0);
        assert_eq!(s.population, 5);
        assert!(s.least_memorable.is_none());
        assert!(s.spread().is_none());
    }

    #[test]
    fn test_summary_extremes() {
        let pop = population();
        let s = summary(&pop, 12);
        assert_eq!(s.least_memorable.map(|i| i.id), Some(25));
        assert_eq!(s.rating_range, Some((1480, 1530)));
        assert_eq!(s.spread(), Some(50));
    }
}

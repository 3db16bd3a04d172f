//! Property-based tests for the rating engine
//!
//! Invariants:
//! - `matches == wins + losses` after any sequence of rounds
//! - Equal priors produce a zero-sum update
//! - Sampled pairs and groups never repeat an id

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use memorank_algo::{
    apply, next_group, next_pair, CatalogEntry, Item, Judgment, Mode, Pending, Population,
    Session,
};

fn catalog(n: u32) -> Vec<CatalogEntry> {
    (1..=n)
        .map(|id| CatalogEntry::new(id, format!("item-{id}"), id))
        .collect()
}

fn arb_rated_population() -> impl Strategy<Value = Population> {
    prop::collection::vec(-500i32..=3500, 5..40).prop_map(|ratings| {
        let items = ratings
            .into_iter()
            .enumerate()
            .map(|(idx, rating)| {
                let id = idx as u32 + 1;
                Item::new(CatalogEntry::new(id, format!("item-{id}"), id)).with_rating(rating)
            })
            .collect();
        Population::from_items(items).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_equal_priors_are_zero_sum(rating in -1000i32..=4000) {
        let mut a = Item::new(CatalogEntry::new(1, "a", 1)).with_rating(rating);
        let mut b = Item::new(CatalogEntry::new(2, "b", 2)).with_rating(rating);
        apply(&mut a, &mut b);
        prop_assert_eq!(a.rating() - rating, -(b.rating() - rating));
        prop_assert_eq!(a.rating() - rating, 16);
    }

    #[test]
    fn prop_winner_never_loses_points(w in 0i32..=3000, l in 0i32..=3000) {
        let mut winner = Item::new(CatalogEntry::new(1, "w", 1)).with_rating(w);
        let mut loser = Item::new(CatalogEntry::new(2, "l", 2)).with_rating(l);
        let update = apply(&mut winner, &mut loser);
        prop_assert!(update.winner_delta >= 0);
        prop_assert!(update.loser_delta <= 0);
        prop_assert!(update.winner_delta <= 32);
        prop_assert!(update.loser_delta >= -32);
    }

    #[test]
    fn prop_samples_are_distinct(pop in arb_rated_population(), seed in any::<u64>(), total in 0u64..2000) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (left, right) = next_pair(&pop, &mut rng).unwrap();
        prop_assert_ne!(left, right);

        let group = next_group(&pop, total, 5, &mut rng).unwrap();
        let unique: HashSet<_> = group.iter().copied().collect();
        prop_assert_eq!(group.len(), 5);
        prop_assert_eq!(unique.len(), 5);
        prop_assert!(group.iter().all(|id| pop.contains(*id)));
    }

    #[test]
    fn prop_counters_stay_consistent(
        seed in any::<u64>(),
        rounds in prop::collection::vec((any::<bool>(), any::<u8>()), 1..80),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = Session::new(Population::from_catalog(catalog(12)).unwrap());
        session.next_round(&mut rng).unwrap();
        let mut expected_total = 0u64;

        for (group_round, mask) in rounds {
            let mode = if group_round { Mode::Group } else { Mode::Pairwise };
            if session.mode() != mode {
                session.switch_mode(mode, &mut rng).unwrap();
            }
            let judgment = match session.pending().cloned().unwrap() {
                Pending::Pair { left, right } => {
                    expected_total += 1;
                    if mask % 2 == 0 {
                        Judgment::Pairwise { winner: left, loser: right }
                    } else {
                        Judgment::Pairwise { winner: right, loser: left }
                    }
                }
                Pending::Group { members } => {
                    expected_total += members.len() as u64;
                    let selected = members
                        .iter()
                        .enumerate()
                        .filter(|(bit, _)| mask & (1u8 << *bit) != 0)
                        .map(|(_, id)| *id)
                        .collect();
                    Judgment::Group { selected }
                }
            };
            session.submit(judgment, &mut rng).unwrap();
        }

        prop_assert_eq!(session.total_judgments(), expected_total);
        for item in session.population().items() {
            prop_assert_eq!(item.matches(), item.wins() + item.losses());
        }
    }
}

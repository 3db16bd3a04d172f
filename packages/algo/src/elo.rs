//! ELO Rating Updater
//!
//! Standard logistic ELO with base 400 and a fixed K-factor of 32.
//!
//! Ratings are integers: each side is rounded right after its update with
//! [`f64::round`], i.e. half away from zero (1484.5 -> 1485, -16.5 -> -17).
//! Repeated rounding is not associative, so changing this rule changes
//! long-run trajectories.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::types::{Item, ItemId, Population};

/// Maximum rating movement for a single judgment
pub const K_FACTOR: f64 = 32.0;

/// Logistic scale: a 400 point gap means 10:1 expected odds
pub const RATING_SCALE: f64 = 400.0;

/// Result of one winner/loser update
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloUpdate {
    pub winner_id: ItemId,
    pub loser_id: ItemId,
    pub winner_delta: i32,
    pub loser_delta: i32,
}

/// Expected score of `rating` against `opponent`
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((f64::from(opponent) - f64::from(rating)) / RATING_SCALE))
}

fn round_rating(value: f64) -> i32 {
    value.round() as i32
}

/// Apply one win of `winner` over `loser`, mutating both records.
///
/// Both expectations are computed from the pre-update ratings.
pub fn apply(winner: &mut Item, loser: &mut Item) -> EloUpdate {
    debug_assert_ne!(winner.id, loser.id, "an item cannot beat itself");

    let expected_winner = expected_score(winner.rating, loser.rating);
    let expected_loser = expected_score(loser.rating, winner.rating);

    let new_winner = round_rating(f64::from(winner.rating) + K_FACTOR * (1.0 - expected_winner));
    let new_loser = round_rating(f64::from(loser.rating) + K_FACTOR * (0.0 - expected_loser));

    let update = EloUpdate {
        winner_id: winner.id,
        loser_id: loser.id,
        winner_delta: new_winner - winner.rating,
        loser_delta: new_loser - loser.rating,
    };

    winner.rating = new_winner;
    winner.wins += 1;
    winner.matches += 1;

    loser.rating = new_loser;
    loser.losses += 1;
    loser.matches += 1;

    update
}

impl Population {
    /// Look up both ids and apply a single win/loss edge.
    ///
    /// Rejects `winner == loser` and unknown ids without touching any record.
    pub fn record_win(&mut self, winner: ItemId, loser: ItemId) -> EngineResult<EloUpdate> {
        let (winner, loser) = self.pair_mut(winner, loser)?;
        Ok(apply(winner, loser))
    }
}

//! Sampling Policy
//!
//! Chooses the items offered to the judge.
//!
//! - Pairwise (battle) mode: two distinct items, uniform, no bias.
//! - Group (recognition) mode: `count` distinct items. Uniform while the
//!   bias factor is below 0.2, afterwards a weighted draw without
//!   replacement that favors items rated below the population median.
//!
//! The random source is always passed in so callers can seed it.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{ItemId, Population};

// ==================== Constants ====================

/// Judgments needed for the bias factor to reach 1.0
pub const BIAS_RAMP_JUDGMENTS: f64 = 500.0;

/// Below this bias factor group selection stays uniform
pub const UNIFORM_BIAS_THRESHOLD: f64 = 0.2;

/// Rating distance from the median that doubles an item's bias weight
pub const RATING_DIFF_SCALE: f64 = 200.0;

/// Floor for the bias weight of far-above-median items
pub const MIN_BIAS_WEIGHT: f64 = 0.1;

/// Weight every item gets regardless of rating
pub const BASE_WEIGHT: f64 = 1.0;

/// Multiplier applied to the bias weight
pub const BIAS_WEIGHT_SCALE: f64 = 3.0;

// ==================== Bias Schedule ====================

/// `min(total_judgments / 500, 1)`
pub fn bias_factor(total_judgments: u64) -> f64 {
    (total_judgments as f64 / BIAS_RAMP_JUDGMENTS).min(1.0)
}

/// Coarse reading of the bias factor, for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasLevel {
    /// Still building initial data, fully random
    Random,
    Slight,
    Focused,
    /// Hunting for the least memorable items
    Hunting,
}

impl BiasLevel {
    pub fn from_factor(factor: f64) -> Self {
        if factor < UNIFORM_BIAS_THRESHOLD {
            BiasLevel::Random
        } else if factor < 0.5 {
            BiasLevel::Slight
        } else if factor < 0.8 {
            BiasLevel::Focused
        } else {
            BiasLevel::Hunting
        }
    }

    pub fn from_judgments(total_judgments: u64) -> Self {
        Self::from_factor(bias_factor(total_judgments))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            BiasLevel::Random => "random mode, building initial data",
            BiasLevel::Slight => "slightly focusing on lower-rated items",
            BiasLevel::Focused => "focusing on less memorable items",
            BiasLevel::Hunting => "hunting for the least memorable items",
        }
    }
}

// ==================== Samplers ====================

fn ensure_population(population: &Population, required: usize) -> EngineResult<()> {
    if population.len() < required {
        return Err(EngineError::InsufficientPopulation {
            required,
            available: population.len(),
        });
    }
    Ok(())
}

/// Two distinct items, every ordered pair equally likely
pub fn next_pair<R: Rng + ?Sized>(
    population: &Population,
    rng: &mut R,
) -> EngineResult<(ItemId, ItemId)> {
    ensure_population(population, 2)?;
    let items = population.items();
    let picks = index::sample(rng, items.len(), 2);
    Ok((items[picks.index(0)].id, items[picks.index(1)].id))
}

/// `count` distinct items, biased toward low ratings as judgments accumulate
pub fn next_group<R: Rng + ?Sized>(
    population: &Population,
    total_judgments: u64,
    count: usize,
    rng: &mut R,
) -> EngineResult<Vec<ItemId>> {
    ensure_population(population, count)?;
    let items = population.items();
    let bias = bias_factor(total_judgments);

    let picks = if bias < UNIFORM_BIAS_THRESHOLD {
        index::sample(rng, items.len(), count).into_vec()
    } else {
        let weights = selection_weights(population, bias);
        weighted_sample_without_replacement(&weights, count, rng)
    };

    Ok(picks.into_iter().map(|idx| items[idx].id).collect())
}

/// Rating at index `len / 2` of the ascending sort.
///
/// For even sizes this is the upper of the two middle ratings.
pub fn median_rating(population: &Population) -> Option<i32> {
    let mut ratings: Vec<i32> = population.items().iter().map(|item| item.rating()).collect();
    ratings.sort_unstable();
    ratings.get(ratings.len() / 2).copied()
}

/// Selection weight for every item, in population order
pub fn selection_weights(population: &Population, bias: f64) -> Vec<f64> {
    let Some(median) = median_rating(population) else {
        return Vec::new();
    };

    population
        .items()
        .iter()
        .map(|item| {
            let rating_diff = f64::from(median) - f64::from(item.rating());
            let bias_weight = (1.0 + (rating_diff / RATING_DIFF_SCALE) * bias).max(MIN_BIAS_WEIGHT);
            BASE_WEIGHT + bias_weight * bias * BIAS_WEIGHT_SCALE
        })
        .collect()
}

/// Sequential cumulative-weight draws, removing each pick from the pool.
///
/// Returns indices into `weights`; at most `count`, fewer if the pool runs
/// dry. Weights must be positive.
pub fn weighted_sample_without_replacement<R: Rng + ?Sized>(
    weights: &[f64],
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut pool: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
    let mut selected = Vec::with_capacity(count.min(pool.len()));

    while selected.len() < count && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, weight)| weight).sum();
        let mut target = rng.gen::<f64>() * total;

        // Float residue can leave target just past the last bucket
        let mut chosen = pool.len() - 1;
        for (pos, (_, weight)) in pool.iter().enumerate() {
            if target < *weight {
                chosen = pos;
                break;
            }
            target -= weight;
        }

        let (idx, _) = pool.remove(chosen);
        selected.push(idx);
    }

    selected
}

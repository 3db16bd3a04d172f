//! Session Controller
//!
//! Owns the population and the round state of one ranking run:
//! the judgment counter, the current mode, and the pending comparison.
//!
//! A round is: offer a sample, receive a [`Judgment`], apply every implied
//! win/loss edge, advance the counter, offer the next sample. Judgments are
//! fully validated against the pending sample before any record changes.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::elo::EloUpdate;
use crate::error::{EngineError, EngineResult};
use crate::sampling::{self, BiasLevel};
use crate::types::{Item, ItemId, Population};

/// Group size used by recognition rounds unless configured otherwise
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Which kind of judgment the session collects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Battle mode: pick the more memorable of two
    #[default]
    Pairwise,
    /// Recognition mode: mark every recognized item of a group
    Group,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pairwise => write!(f, "pairwise"),
            Mode::Group => write!(f, "group"),
        }
    }
}

/// Sample currently offered to the judge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pending {
    Pair { left: ItemId, right: ItemId },
    Group { members: Vec<ItemId> },
}

impl Pending {
    pub fn mode(&self) -> Mode {
        match self {
            Pending::Pair { .. } => Mode::Pairwise,
            Pending::Group { .. } => Mode::Group,
        }
    }

    pub fn ids(&self) -> Vec<ItemId> {
        match self {
            Pending::Pair { left, right } => vec![*left, *right],
            Pending::Group { members } => members.clone(),
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        match self {
            Pending::Pair { left, right } => *left == id || *right == id,
            Pending::Group { members } => members.contains(&id),
        }
    }
}

/// A judge's answer to the pending sample
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Judgment {
    Pairwise { winner: ItemId, loser: ItemId },
    /// Recognized members; each beats every unselected member
    Group { selected: Vec<ItemId> },
}

/// What a committed round changed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub updates: Vec<EloUpdate>,
    pub judgments_added: u64,
    pub total_judgments: u64,
}

#[derive(Clone, Debug)]
pub struct Session {
    population: Population,
    total_judgments: u64,
    mode: Mode,
    group_size: usize,
    pending: Option<Pending>,
}

impl Session {
    /// Fresh run: pairwise mode, no judgments yet, nothing pending
    pub fn new(population: Population) -> Self {
        Self::restore(population, 0, Mode::Pairwise)
    }

    /// Resume a run from persisted counters; the pending sample is not restored
    pub fn restore(population: Population, total_judgments: u64, mode: Mode) -> Self {
        Self {
            population,
            total_judgments,
            mode,
            group_size: DEFAULT_GROUP_SIZE,
            pending: None,
        }
    }

    /// Group size for recognition rounds (at least 1)
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size.max(1);
        self
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn total_judgments(&self) -> u64 {
        self.total_judgments
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    pub fn bias_factor(&self) -> f64 {
        sampling::bias_factor(self.total_judgments)
    }

    pub fn bias_level(&self) -> BiasLevel {
        BiasLevel::from_judgments(self.total_judgments)
    }

    /// Records of the pending sample, in offer order
    pub fn pending_items(&self) -> Vec<&Item> {
        self.pending
            .as_ref()
            .map(|pending| {
                pending
                    .ids()
                    .into_iter()
                    .filter_map(|id| self.population.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn into_population(self) -> Population {
        self.population
    }

    /// Draw and hold a new sample for the current mode, replacing any pending one
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EngineResult<&Pending> {
        let pending = self.draw(self.mode, rng)?;
        Ok(&*self.pending.insert(pending))
    }

    /// Change mode and offer a fresh sample; the counter is untouched.
    ///
    /// If no sample can be drawn in the new mode, mode and pending sample
    /// stay as they were.
    pub fn switch_mode<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) -> EngineResult<&Pending> {
        let pending = self.draw(mode, rng)?;
        self.mode = mode;
        Ok(&*self.pending.insert(pending))
    }

    fn draw<R: Rng + ?Sized>(&self, mode: Mode, rng: &mut R) -> EngineResult<Pending> {
        let pending = match mode {
            Mode::Pairwise => {
                let (left, right) = sampling::next_pair(&self.population, rng)?;
                Pending::Pair { left, right }
            }
            Mode::Group => {
                let members = sampling::next_group(
                    &self.population,
                    self.total_judgments,
                    self.group_size,
                    rng,
                )?;
                Pending::Group { members }
            }
        };

        tracing::debug!(
            %mode,
            total_judgments = self.total_judgments,
            items = ?pending.ids(),
            "offering sample"
        );
        Ok(pending)
    }

    /// Commit a judgment for the pending sample and offer the next one
    pub fn submit<R: Rng + ?Sized>(
        &mut self,
        judgment: Judgment,
        rng: &mut R,
    ) -> EngineResult<RoundOutcome> {
        let (edges, judgments_added) = match self.plan_edges(&judgment) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(error = %err, ?judgment, "judgment rejected");
                return Err(err);
            }
        };

        let mut updates = Vec::with_capacity(edges.len());
        for (winner, loser) in edges {
            updates.push(self.population.record_win(winner, loser)?);
        }
        self.total_judgments += judgments_added;
        self.pending = None;

        tracing::debug!(
            edges = updates.len(),
            judgments_added,
            total_judgments = self.total_judgments,
            "round committed"
        );

        let outcome = RoundOutcome {
            updates,
            judgments_added,
            total_judgments: self.total_judgments,
        };
        self.next_round(rng)?;
        Ok(outcome)
    }

    /// Validate a judgment and list its win/loss edges without mutating anything
    fn plan_edges(&self, judgment: &Judgment) -> EngineResult<(Vec<(ItemId, ItemId)>, u64)> {
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| EngineError::InvalidJudgment("no comparison is pending".to_string()))?;

        match (pending, judgment) {
            (Pending::Pair { left, right }, Judgment::Pairwise { winner, loser }) => {
                if winner == loser {
                    return Err(EngineError::InvalidJudgment(format!(
                        "winner and loser are both item {winner}"
                    )));
                }
                let offered = (*winner == *left && *loser == *right)
                    || (*winner == *right && *loser == *left);
                if !offered {
                    return Err(EngineError::InvalidJudgment(format!(
                        "pair ({winner}, {loser}) is not the pending pair ({left}, {right})"
                    )));
                }
                Ok((vec![(*winner, *loser)], 1))
            }
            (Pending::Group { members }, Judgment::Group { selected }) => {
                if let Some(stray) = selected.iter().find(|id| !members.contains(id)) {
                    return Err(EngineError::InvalidJudgment(format!(
                        "item {stray} is not in the pending group"
                    )));
                }
                let recognized: HashSet<ItemId> = selected.iter().copied().collect();

                // Empty or full selection yields no edges but still counts
                let mut edges = Vec::new();
                for &winner in members.iter().filter(|id| recognized.contains(*id)) {
                    for &loser in members.iter().filter(|id| !recognized.contains(*id)) {
                        edges.push((winner, loser));
                    }
                }
                Ok((edges, members.len() as u64))
            }
            (pending, _) => Err(EngineError::InvalidJudgment(format!(
                "judgment does not match the pending {} sample",
                pending.mode()
            ))),
        }
    }
}

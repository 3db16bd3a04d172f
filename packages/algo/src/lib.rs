//! # memorank-algo - memorability rating engine
//!
//! Turns a stream of "which is more memorable" judgments into a stable
//! relative ranking over a fixed population of items.
//!
//! - **ELO updates** - logistic expected score, base 400, K = 32, integer ratings
//! - **Pairwise sampling** - uniform pairs for battle rounds
//! - **Group sampling** - recognition groups biased toward low-rated items as
//!   judgments accumulate
//! - **Session control** - pending sample, judgment validation, counters
//!
//! No IO happens here. Persistence and catalog retrieval belong to the
//! caller; randomness is always injected.
//!
//! ## Modules
//!
//! - [`types`] - items, catalog rows, the population
//! - [`elo`] - rating updater
//! - [`sampling`] - bias schedule, pair and group samplers
//! - [`session`] - round state machine
//! - [`stats`] - ranking listings and summaries
//! - [`sanitize`] - validation and health diagnostics
//! - [`error`] - engine error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use memorank_algo::{CatalogEntry, Judgment, Pending, Population, Session};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let catalog = (1..=10)
//!     .map(|id| CatalogEntry::new(id, format!("item-{id}"), id))
//!     .collect();
//! let mut session = Session::new(Population::from_catalog(catalog).unwrap());
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! if let Pending::Pair { left, right } = session.next_round(&mut rng).unwrap().clone() {
//!     session
//!         .submit(Judgment::Pairwise { winner: left, loser: right }, &mut rng)
//!         .unwrap();
//! }
//! assert_eq!(session.total_judgments(), 1);
//! ```

pub mod elo;
pub mod error;
pub mod sampling;
pub mod sanitize;
pub mod session;
pub mod stats;
pub mod types;

pub use elo::{apply, expected_score, EloUpdate, K_FACTOR};
pub use error::{EngineError, EngineResult};
pub use sampling::{bias_factor, next_group, next_pair, BiasLevel};
pub use session::{Judgment, Mode, Pending, RoundOutcome, Session, DEFAULT_GROUP_SIZE};
pub use stats::{rankings, summary, RankedEntry, RankingQuery, SortKey, Summary};
pub use types::{CatalogEntry, Item, ItemId, Population, INITIAL_RATING};

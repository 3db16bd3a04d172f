//! Ranking run wired to its collaborators
//!
//! [`Ranker`] restores state from the store (or builds it from the catalog
//! on first run), forwards judgments to the session, and saves a full
//! snapshot after every change.

use memorank_algo::{
    rankings, summary, EngineError, Judgment, Mode, Pending, Population, RankedEntry,
    RankingQuery, RoundOutcome, Session, Summary,
};
use rand::Rng;
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogLoader};
use crate::store::{Snapshot, StateStore, StoreError};

#[derive(Error, Debug)]
pub enum RankerError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Store failed; no retry or fallback is attempted
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RankerResult<T> = Result<T, RankerError>;

pub struct Ranker<S, C, R> {
    store: S,
    catalog: C,
    session: Session,
    group_size: usize,
    rng: R,
}

impl<S, C, R> Ranker<S, C, R>
where
    S: StateStore,
    C: CatalogLoader,
    R: Rng,
{
    /// Restore the saved run, or populate from the catalog on first run.
    /// A sample is pending once this returns.
    pub fn open(store: S, catalog: C, group_size: usize, mut rng: R) -> RankerResult<Self> {
        let session = match store.load()? {
            Some(snapshot) => {
                let mut session = snapshot.into_session()?.with_group_size(group_size);
                session.next_round(&mut rng)?;
                tracing::info!(
                    items = session.population().len(),
                    total_judgments = session.total_judgments(),
                    mode = %session.mode(),
                    "ranking state restored"
                );
                session
            }
            None => {
                let session = fresh_session(&catalog, Mode::Pairwise, group_size, &mut rng)?;
                store.save(&Snapshot::capture(&session))?;
                session
            }
        };

        Ok(Self {
            store,
            catalog,
            session,
            group_size,
            rng,
        })
    }

    /// Start over from the catalog without restoring the saved run.
    ///
    /// Whatever the store holds is discarded, including state that no longer
    /// loads. The saved mode is kept when it can still be read; a group mode
    /// whose group no longer fits the catalog falls back to pairwise.
    pub fn open_fresh(store: S, catalog: C, group_size: usize, mut rng: R) -> RankerResult<Self> {
        let mode = store
            .load()
            .ok()
            .flatten()
            .map(|snapshot| snapshot.mode)
            .unwrap_or_default();

        let session = match fresh_session(&catalog, mode, group_size, &mut rng) {
            Err(RankerError::Engine(EngineError::InsufficientPopulation { .. }))
                if mode == Mode::Group =>
            {
                tracing::warn!(group_size, "group does not fit the catalog, starting in pairwise mode");
                fresh_session(&catalog, Mode::Pairwise, group_size, &mut rng)?
            }
            other => other?,
        };
        store.clear()?;

        let ranker = Self {
            store,
            catalog,
            session,
            group_size,
            rng,
        };
        tracing::info!(items = ranker.session.population().len(), "ranking state reset");
        ranker.persist()?;
        Ok(ranker)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.session.pending()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Commit a judgment and persist; rejected judgments change nothing
    pub fn submit(&mut self, judgment: Judgment) -> RankerResult<RoundOutcome> {
        let outcome = self.session.submit(judgment, &mut self.rng)?;
        self.persist()?;
        Ok(outcome)
    }

    pub fn switch_mode(&mut self, mode: Mode) -> RankerResult<()> {
        self.session.switch_mode(mode, &mut self.rng)?;
        self.persist()
    }

    /// Discard all progress and start over from the catalog.
    ///
    /// The current mode is kept; ratings and counters return to their
    /// initial values. Nothing changes if the catalog cannot be loaded.
    pub fn reset(&mut self) -> RankerResult<()> {
        let session = fresh_session(&self.catalog, self.session.mode(), self.group_size, &mut self.rng)?;
        self.store.clear()?;
        self.session = session;

        tracing::info!(items = self.session.population().len(), "ranking state reset");
        self.persist()
    }

    pub fn rankings(&self, query: &RankingQuery) -> Vec<RankedEntry<'_>> {
        rankings(self.session.population(), query)
    }

    pub fn summary(&self) -> Summary<'_> {
        summary(self.session.population(), self.session.total_judgments())
    }

    fn persist(&self) -> RankerResult<()> {
        self.store
            .save(&Snapshot::capture(&self.session))
            .map_err(|err| {
                tracing::error!(error = %err, "failed to save ranking state");
                RankerError::StoreUnavailable(err)
            })
    }
}

/// Catalog population at initial ratings with a sample already pending
fn fresh_session<C, R>(catalog: &C, mode: Mode, group_size: usize, rng: &mut R) -> RankerResult<Session>
where
    C: CatalogLoader,
    R: Rng,
{
    let population = Population::from_catalog(catalog.load_catalog()?)?;
    tracing::info!(items = population.len(), "population built from catalog");

    let mut session = Session::restore(population, 0, mode).with_group_size(group_size);
    session.next_round(rng)?;
    Ok(session)
}

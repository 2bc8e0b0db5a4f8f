use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{DbId, IdSet},
};

/// Source of uniform indices for fallback selection
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`; `len` is never zero
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG, used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible RNG for tests and replays
#[derive(Debug)]
pub struct SeededRandom(Mutex<StdRng>);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}

/// Picks one movie outside `exclusion`, each eligible movie equally likely
///
/// The eligible set is read at call time. Returns `None` when every movie in
/// the catalog is excluded.
pub async fn select(
    store: &dyn MovieStore,
    random: &dyn RandomSource,
    exclusion: &IdSet,
) -> AppResult<Option<DbId>> {
    let eligible = store.movie_ids_excluding(exclusion).await?;

    tracing::debug!(eligible = eligible.len(), "Selecting random movie");

    if eligible.is_empty() {
        return Ok(None);
    }
    Ok(Some(eligible[random.pick(eligible.len())]))
}

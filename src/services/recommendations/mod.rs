//! Next-movie recommendation
//!
//! A request resolves the caller, reads their swipe history, and scores
//! unseen movies by how many genre, actor and director links they share with
//! the movies the caller liked or watchlisted. When there is no history to
//! learn from, or nothing unseen shares an attribute, a movie is drawn
//! uniformly at random from everything the caller has not yet seen.
//!
//! Every request re-derives its state from the store; nothing is shared
//! between requests.

use std::sync::Arc;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{DbId, IdSet, Movie},
    services::users,
};

pub mod attributes;
pub mod fallback;
pub mod preferences;
pub mod scoring;

pub use fallback::{RandomSource, SeededRandom, ThreadRandom};

/// How the recommended movie was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Top candidate by attribute overlap
    Scored { score: u32 },
    /// Uniform draw over unseen movies
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub strategy: Strategy,
}

/// Recommendation engine over an injected store
#[derive(Clone)]
pub struct Recommender {
    store: Arc<dyn MovieStore>,
    random: Arc<dyn RandomSource>,
}

impl Recommender {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self::with_random(store, Arc::new(ThreadRandom))
    }

    pub fn with_random(store: Arc<dyn MovieStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    /// Recommends the next movie for the caller identified by `uid`
    ///
    /// `Ok(None)` means the caller has already seen every movie in the
    /// catalog. Storage failures abort the request; nothing is retried.
    #[tracing::instrument(skip(self))]
    pub async fn recommend(&self, uid: Option<&str>) -> AppResult<Option<Recommendation>> {
        let store = self.store.as_ref();
        let user_id = users::resolve(store, uid, "Missing uid parameter").await?;

        let prefs = preferences::extract(store, user_id).await?;
        let exclusion = prefs.exclusion();
        let positive = prefs.positive();

        if positive.is_empty() {
            tracing::info!(user_id, "No positive history, selecting at random");
            return self.random_pick(&exclusion).await;
        }

        let preferred = attributes::aggregate(store, &positive).await?;
        match scoring::score(store, &preferred, &exclusion).await? {
            Some(candidate) => {
                tracing::info!(
                    user_id,
                    movie_id = candidate.movie_id,
                    score = candidate.score,
                    "Recommending top scored movie"
                );
                let movie = self.load(candidate.movie_id).await?;
                Ok(Some(Recommendation {
                    movie,
                    strategy: Strategy::Scored {
                        score: candidate.score,
                    },
                }))
            }
            None => {
                tracing::info!(user_id, "No scored candidate, selecting at random");
                self.random_pick(&exclusion).await
            }
        }
    }

    async fn random_pick(&self, exclusion: &IdSet) -> AppResult<Option<Recommendation>> {
        let Some(movie_id) =
            fallback::select(self.store.as_ref(), self.random.as_ref(), exclusion).await?
        else {
            tracing::info!("No eligible movie left");
            return Ok(None);
        };

        let movie = self.load(movie_id).await?;
        Ok(Some(Recommendation {
            movie,
            strategy: Strategy::Random,
        }))
    }

    /// Fetches a movie the store just reported; a missing row is a storage fault
    async fn load(&self, movie_id: DbId) -> AppResult<Movie> {
        self.store
            .movie_by_id(movie_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("movie {} disappeared", movie_id)))
    }
}

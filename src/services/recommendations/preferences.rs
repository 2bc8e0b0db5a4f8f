use crate::{
    db::MovieStore,
    error::AppResult,
    models::{DbId, IdSet},
};

/// A user's interaction history, split by signal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub liked: IdSet,
    pub watchlisted: IdSet,
    pub disliked: IdSet,
}

impl Preferences {
    /// Every movie the user has already responded to; never recommended again
    pub fn exclusion(&self) -> IdSet {
        self.liked
            .iter()
            .chain(&self.watchlisted)
            .chain(&self.disliked)
            .copied()
            .collect()
    }

    /// Liked or watchlisted movies, whose attributes describe the user's taste
    ///
    /// A watchlisted movie that was later disliked still counts here; the
    /// exclusion set keeps it out of the candidates.
    pub fn positive(&self) -> IdSet {
        self.liked.union(&self.watchlisted).copied().collect()
    }
}

/// Reads the three interaction sets concurrently
pub async fn extract(store: &dyn MovieStore, user_id: DbId) -> AppResult<Preferences> {
    let (liked, watchlisted, disliked) = tokio::try_join!(
        store.liked_movie_ids(user_id),
        store.watchlisted_movie_ids(user_id),
        store.disliked_movie_ids(user_id),
    )?;

    tracing::debug!(
        user_id,
        liked = liked.len(),
        watchlisted = watchlisted.len(),
        disliked = disliked.len(),
        "Extracted preferences"
    );

    Ok(Preferences {
        liked,
        watchlisted,
        disliked,
    })
}

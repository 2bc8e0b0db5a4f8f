use crate::{
    error::AppResult,
    models::{AttributeDomain, DbId, IdSet, Movie, UserCreation, WatchlistItem},
};

/// Storage-access capability injected into every component
///
/// All reads are independent snapshots; implementations may serve
/// concurrent requests. Writes keyed by (user, movie) must be atomic
/// insert-or-update statements so a pair never owns more than one row.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Resolves an external identity to the internal user id
    async fn find_user_id(&self, uid: &str) -> AppResult<Option<DbId>>;

    /// Inserts a user unless one with the same external identity exists
    async fn create_user(
        &self,
        uid: &str,
        email: &str,
        name: Option<String>,
    ) -> AppResult<UserCreation>;

    async fn liked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet>;

    async fn disliked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet>;

    async fn watchlisted_movie_ids(&self, user_id: DbId) -> AppResult<IdSet>;

    /// Distinct attribute ids of `domain` linked to any of `movie_ids`
    async fn attribute_ids_for_movies(
        &self,
        domain: AttributeDomain,
        movie_ids: &IdSet,
    ) -> AppResult<IdSet>;

    /// Movie id of every link row in `domain` whose attribute is in `attribute_ids`
    ///
    /// One entry per row, duplicates included. An empty set yields no rows.
    async fn matching_movie_rows(
        &self,
        domain: AttributeDomain,
        attribute_ids: &IdSet,
    ) -> AppResult<Vec<DbId>>;

    /// Every catalog movie id not contained in `excluded`
    async fn movie_ids_excluding(&self, excluded: &IdSet) -> AppResult<Vec<DbId>>;

    async fn movie_by_id(&self, movie_id: DbId) -> AppResult<Option<Movie>>;

    /// Records a like (`true`) or dislike (`false`), overwriting any earlier swipe
    async fn upsert_interaction(&self, user_id: DbId, movie_id: DbId, liked: bool)
        -> AppResult<()>;

    async fn insert_watchlist_if_absent(&self, user_id: DbId, movie_id: DbId) -> AppResult<()>;

    async fn set_watched(&self, user_id: DbId, movie_id: DbId, watched: bool) -> AppResult<()>;

    async fn remove_watchlist_entry(&self, user_id: DbId, movie_id: DbId) -> AppResult<()>;

    async fn watchlist(&self, user_id: DbId) -> AppResult<Vec<WatchlistItem>>;
}

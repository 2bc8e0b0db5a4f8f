use crate::{
    db::MovieStore,
    error::AppResult,
    models::{DbId, WatchlistItem},
    services::users,
};

const MISSING_IDS: &str = "Missing uid or movieId";

pub async fn list(store: &dyn MovieStore, uid: Option<&str>) -> AppResult<Vec<WatchlistItem>> {
    let user_id = users::resolve(store, uid, "Missing uid parameter").await?;
    store.watchlist(user_id).await
}

pub async fn remove(store: &dyn MovieStore, uid: Option<&str>, movie_id: DbId) -> AppResult<()> {
    let user_id = users::resolve(store, uid, MISSING_IDS).await?;
    store.remove_watchlist_entry(user_id, movie_id).await?;
    tracing::info!(user_id, movie_id, "Removed from watchlist");
    Ok(())
}

/// Sets the watched flag; a movie not on the watchlist is left untouched
pub async fn set_watched(
    store: &dyn MovieStore,
    uid: Option<&str>,
    movie_id: DbId,
    watched: bool,
) -> AppResult<()> {
    let user_id = users::resolve(store, uid, MISSING_IDS).await?;
    store.set_watched(user_id, movie_id, watched).await?;
    tracing::info!(user_id, movie_id, watched, "Toggled watched");
    Ok(())
}

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{DbId, SwipeAction},
    services::users,
};

/// Records a like, dislike or watchlist addition
///
/// Likes and dislikes share one row per (user, movie), so the latest swipe
/// wins. Adding to the watchlist is independent of that row and keeps any
/// existing watched flag.
pub async fn record(
    store: &dyn MovieStore,
    uid: Option<&str>,
    movie_id: Option<DbId>,
    action: Option<&str>,
) -> AppResult<SwipeAction> {
    let missing = || AppError::InvalidInput("uid, movieId and action are required".to_string());
    let movie_id = movie_id.ok_or_else(missing)?;
    let action: SwipeAction = action.ok_or_else(missing)?.parse()?;
    let user_id = users::resolve(store, uid, "uid, movieId and action are required").await?;

    match action {
        SwipeAction::Like => store.upsert_interaction(user_id, movie_id, true).await?,
        SwipeAction::Dislike => store.upsert_interaction(user_id, movie_id, false).await?,
        SwipeAction::Watchlist => store.insert_watchlist_if_absent(user_id, movie_id).await?,
    }

    tracing::info!(user_id, movie_id, %action, "Recorded swipe");
    Ok(action)
}

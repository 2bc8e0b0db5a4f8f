use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    extractors::json::OptionalJson,
    models::{DbId, WatchlistItem},
    routes::AppState,
    services::watchlist,
};

#[derive(Debug, Deserialize)]
pub struct UidQuery {
    uid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetWatchedRequest {
    uid: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    watched: bool,
}

/// Reads a loosely typed flag: `true`, `1`, `"yes"` are set; `false`, `0`,
/// `""` and `null` are not
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Number(n)) => n != 0.0 && !n.is_nan(),
        Some(Flag::Text(t)) => !t.is_empty(),
        None => false,
    })
}

/// Handler listing the caller's watchlist with watched flags
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UidQuery>,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    let items = watchlist::list(state.store.as_ref(), params.uid.as_deref()).await?;
    Ok(Json(items))
}

/// Handler removing a movie from the caller's watchlist
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<DbId>,
    Query(params): Query<UidQuery>,
) -> AppResult<Json<Value>> {
    watchlist::remove(state.store.as_ref(), params.uid.as_deref(), movie_id).await?;
    Ok(Json(json!({ "message": "Removed from watchlist" })))
}

/// Handler toggling the watched flag; uid may come from the body or the query.
/// A request without a body marks the movie unwatched.
pub async fn set_watched(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<DbId>,
    Query(params): Query<UidQuery>,
    OptionalJson(request): OptionalJson<SetWatchedRequest>,
) -> AppResult<Json<Value>> {
    let uid = request.uid.or(params.uid);
    watchlist::set_watched(
        state.store.as_ref(),
        uid.as_deref(),
        movie_id,
        request.watched,
    )
    .await?;
    Ok(Json(json!({ "message": format!("Set watched={}", request.watched) })))
}

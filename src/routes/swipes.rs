use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    extractors::json::AppJson,
    models::{DbId, SwipeAction},
    routes::AppState,
    services::swipes,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub uid: Option<String>,
    pub movie_id: Option<DbId>,
    pub action: Option<String>,
}

/// Handler for recording a like, dislike or watchlist swipe
pub async fn swipe(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<SwipeRequest>,
) -> AppResult<Json<Value>> {
    let action = swipes::record(
        state.store.as_ref(),
        request.uid.as_deref(),
        request.movie_id,
        request.action.as_deref(),
    )
    .await?;

    let message = match action {
        SwipeAction::Watchlist => "Added to watchlist".to_string(),
        other => format!("Recorded {}", other),
    };
    Ok(Json(json!({ "message": message })))
}

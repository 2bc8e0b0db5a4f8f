use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::AppResult, middleware::request_id::RequestId, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    uid: Option<String>,
}

/// Handler for the next-movie endpoint
///
/// Responds with the movie, or `{}` once the caller has seen everything.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Value>> {
    let recommendation = state.recommender.recommend(params.uid.as_deref()).await?;

    let body = match recommendation {
        Some(rec) => {
            tracing::info!(
                request_id = %request_id,
                movie_id = rec.movie.id,
                strategy = ?rec.strategy,
                "Recommendation served"
            );
            json!(rec.movie)
        }
        None => json!({}),
    };

    Ok(Json(body))
}

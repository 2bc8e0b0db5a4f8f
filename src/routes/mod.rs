use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::MovieStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::Recommender,
};

pub mod recommendations;
pub mod swipes;
pub mod users;
pub mod watchlist;

/// Shared handler state
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        let recommender = Recommender::new(store.clone());
        Self { store, recommender }
    }

    pub fn with_recommender(store: Arc<dyn MovieStore>, recommender: Recommender) -> Self {
        Self { store, recommender }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(users::create))
        .route("/movies", get(recommendations::recommend))
        .route("/swipe", post(swipes::swipe))
        .route("/watchlist", get(watchlist::list))
        .route(
            "/watchlist/:movie_id",
            put(watchlist::set_watched).delete(watchlist::remove),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

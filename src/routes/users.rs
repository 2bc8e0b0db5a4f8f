use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult, extractors::json::AppJson, models::UserCreation, routes::AppState,
    services::users,
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Handler for provisioning a user after external sign-up
pub async fn create(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let outcome = users::create(
        state.store.as_ref(),
        request.uid.as_deref(),
        request.email.as_deref(),
        request.name,
    )
    .await?;

    Ok(match outcome {
        UserCreation::Created => (StatusCode::CREATED, Json(json!({ "message": "User created" }))),
        UserCreation::AlreadyExists => (
            StatusCode::OK,
            Json(json!({ "message": "User already exists" })),
        ),
    })
}

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{DbId, UserCreation},
};

/// Resolves a caller's external identity to the internal user id
///
/// An absent or blank identity is rejected with `missing` as the message
/// before the store is consulted.
pub async fn resolve(store: &dyn MovieStore, uid: Option<&str>, missing: &str) -> AppResult<DbId> {
    let uid = uid
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AppError::InvalidInput(missing.to_string()))?;

    store
        .find_user_id(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Provisions a user for an external identity, once
pub async fn create(
    store: &dyn MovieStore,
    uid: Option<&str>,
    email: Option<&str>,
    name: Option<String>,
) -> AppResult<UserCreation> {
    let (Some(uid), Some(email)) = (non_blank(uid), non_blank(email)) else {
        return Err(AppError::InvalidInput("Missing user information".to_string()));
    };

    let outcome = store.create_user(uid, email, name).await?;
    tracing::info!(uid, ?outcome, "User provisioned");
    Ok(outcome)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

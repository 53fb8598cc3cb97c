//! User profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use brainvault_core::{CreateUserRequest, UpdateUserRequest, User, UserRepository};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// Explicitly create a user record.
pub async fn create_user(
    State(state): State<AppState>,
    _auth: Auth,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.insert(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the caller's profile.
pub async fn get_me(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .fetch_by_auth_id(&auth.principal.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// Update the caller's profile.
pub async fn update_me(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .fetch_by_auth_id(&auth.principal.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let updated = state
        .users
        .update(user.id, req)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

/// Delete the caller's account (cascades to that user's ideas).
pub async fn delete_me(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .fetch_by_auth_id(&auth.principal.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !state.users.delete(user.id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

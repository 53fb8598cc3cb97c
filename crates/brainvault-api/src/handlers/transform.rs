//! Transformation handler.

use axum::extract::State;
use axum::Json;

use brainvault_core::{TransformRequest, TransformResponse};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// Transform an idea into the requested output kind.
///
/// Unknown kinds are rejected at deserialization (422) before any external
/// call; a missing or foreign idea is a 404; an unreachable provider is
/// never an error — the deterministic local fallback answers instead.
pub async fn transform_idea(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<TransformRequest>,
) -> Result<Json<TransformResponse>, ApiError> {
    let response = state
        .transform
        .transform(&auth.principal.user_id, req)
        .await?;
    Ok(Json(response))
}

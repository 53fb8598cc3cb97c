//! Idea CRUD, search, analysis, and stats handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use brainvault_core::{
    CreateIdeaRequest, Idea, IdeaAnalysis, IdeaRepository, ListIdeasRequest, UpdateIdeaRequest,
};
use brainvault_jobs::EnrichmentTask;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// Query parameters for `GET /ideas`.
#[derive(Debug, Deserialize)]
pub struct IdeasQuery {
    /// Full-text query; when present, filters and pagination are ignored
    /// and the request delegates to search.
    pub q: Option<String>,
    pub project: Option<String>,
    pub theme: Option<String>,
    pub emotion: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    brainvault_core::defaults::PAGE_LIMIT
}

/// Create a new idea and dispatch its enrichment trigger.
///
/// The response carries the idea with enrichment fields still null; the
/// capture path never waits for the pipeline.
pub async fn create_idea(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<CreateIdeaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let idea = state.ideas.insert(&auth.principal.user_id, req).await?;

    state.enrichment.dispatch(EnrichmentTask {
        idea_id: idea.id,
        owner: idea.user_id.clone(),
        content: idea.content.clone(),
    });

    Ok((StatusCode::CREATED, Json(idea)))
}

/// List or search the caller's ideas.
pub async fn list_ideas(
    State(state): State<AppState>,
    auth: Auth,
    Query(params): Query<IdeasQuery>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    let owner = &auth.principal.user_id;

    let ideas = match params.q {
        Some(query) if !query.trim().is_empty() => state.ideas.search(owner, &query).await?,
        _ => {
            state
                .ideas
                .list(
                    owner,
                    ListIdeasRequest {
                        project: params.project,
                        theme: params.theme,
                        emotion: params.emotion,
                        skip: params.skip,
                        limit: params.limit,
                    },
                )
                .await?
        }
    };

    Ok(Json(ideas))
}

/// Full-text search endpoint (`GET /ideas/search?q=`).
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search_ideas(
    State(state): State<AppState>,
    auth: Auth,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    let ideas = state
        .ideas
        .search(&auth.principal.user_id, &params.q)
        .await?;
    Ok(Json(ideas))
}

/// Fetch one idea.
pub async fn get_idea(
    State(state): State<AppState>,
    auth: Auth,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Idea>, ApiError> {
    let idea = state
        .ideas
        .fetch(idea_id, &auth.principal.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(idea))
}

/// Apply a partial update to one idea.
pub async fn update_idea(
    State(state): State<AppState>,
    auth: Auth,
    Path(idea_id): Path<Uuid>,
    Json(req): Json<UpdateIdeaRequest>,
) -> Result<Json<Idea>, ApiError> {
    let idea = state
        .ideas
        .update(idea_id, &auth.principal.user_id, req)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(idea))
}

/// Delete one idea.
pub async fn delete_idea(
    State(state): State<AppState>,
    auth: Auth,
    Path(idea_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .ideas
        .delete(idea_id, &auth.principal.user_id)
        .await?;
    if !removed {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Enrichment read-back for one idea.
pub async fn get_idea_analysis(
    State(state): State<AppState>,
    auth: Auth,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaAnalysis>, ApiError> {
    let idea = state
        .ideas
        .fetch(idea_id, &auth.principal.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(IdeaAnalysis::from(idea)))
}

/// Per-owner statistics summary.
pub async fn get_idea_stats(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<brainvault_core::IdeaStats>, ApiError> {
    let stats = state.ideas.stats(&auth.principal.user_id).await?;
    Ok(Json(stats))
}

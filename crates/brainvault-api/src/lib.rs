//! # brainvault-api
//!
//! HTTP API surface for brainvault: router, handlers, auth extractor, and
//! the transform/voice service layer. The binary in `main.rs` wires this
//! against Postgres and the configured external capabilities.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use brainvault_core::{IdeaRepository, UserRepository};
use brainvault_jobs::EnrichmentQueue;

use auth::TokenVerifier;
use services::{TransformService, VoiceService};

pub use error::ApiError;

/// Application state shared across handlers.
///
/// Explicitly constructed at startup and passed by reference; nothing here
/// is a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, used directly only by the health check.
    pub pool: sqlx::PgPool,
    /// Idea store.
    pub ideas: Arc<dyn IdeaRepository>,
    /// User directory.
    pub users: Arc<dyn UserRepository>,
    /// Transformation engine.
    pub transform: Arc<TransformService>,
    /// Voice intake.
    pub voice: Arc<VoiceService>,
    /// Fire-and-forget enrichment trigger queue.
    pub enrichment: EnrichmentQueue,
    /// Authentication collaborator.
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Build the full application router for the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/ideas",
            post(handlers::ideas::create_idea).get(handlers::ideas::list_ideas),
        )
        .route("/ideas/search", get(handlers::ideas::search_ideas))
        .route("/ideas/stats/summary", get(handlers::ideas::get_idea_stats))
        .route(
            "/ideas/:id",
            get(handlers::ideas::get_idea)
                .put(handlers::ideas::update_idea)
                .delete(handlers::ideas::delete_idea),
        )
        .route("/ideas/:id/analysis", get(handlers::ideas::get_idea_analysis))
        .route("/transform", post(handlers::transform::transform_idea))
        .route("/voice/transcribe", post(handlers::voice::transcribe_audio))
        .route("/voice/extract-ideas", post(handlers::voice::extract_ideas))
        .route("/users", post(handlers::users::create_user))
        .route(
            "/users/me",
            get(handlers::users::get_me)
                .put(handlers::users::update_me)
                .delete(handlers::users::delete_me),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .with_state(state)
}

/// Root endpoint: service identity.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "BrainVault API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Health check: reports database connectivity.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Json(serde_json::json!({
        "status": if database_ok { "healthy" } else { "degraded" },
        "database": if database_ok { "connected" } else { "disconnected" },
    }))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory idea store for service-level tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use brainvault_core::{
        new_v7, CreateIdeaRequest, Error, Idea, IdeaRepository, IdeaStats, ListIdeasRequest,
        Result, UpdateIdeaRequest,
    };

    #[derive(Default)]
    pub struct MemoryIdeaRepository {
        ideas: Mutex<HashMap<Uuid, Idea>>,
    }

    impl MemoryIdeaRepository {
        pub fn seed(&self, owner: &str, content: &str) -> Idea {
            let idea = Idea {
                id: new_v7(),
                user_id: owner.to_string(),
                content: content.to_string(),
                source: "manual".to_string(),
                timestamp: chrono::Utc::now(),
                project: None,
                theme: None,
                emotion: None,
                transformed_output: None,
            };
            self.ideas.lock().unwrap().insert(idea.id, idea.clone());
            idea
        }

        pub fn get(&self, id: Uuid) -> Option<Idea> {
            self.ideas.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl IdeaRepository for MemoryIdeaRepository {
        async fn insert(&self, owner: &str, req: CreateIdeaRequest) -> Result<Idea> {
            req.validate()?;
            Ok(self.seed(owner, &req.content))
        }

        async fn fetch(&self, id: Uuid, owner: &str) -> Result<Option<Idea>> {
            Ok(self.get(id).filter(|i| i.user_id == owner))
        }

        async fn list(&self, owner: &str, req: ListIdeasRequest) -> Result<Vec<Idea>> {
            let req = req.normalized();
            let mut ideas: Vec<Idea> = self
                .ideas
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.user_id == owner)
                .filter(|i| req.project.as_ref().map_or(true, |p| i.project.as_ref() == Some(p)))
                .filter(|i| req.theme.as_ref().map_or(true, |t| i.theme.as_ref() == Some(t)))
                .filter(|i| req.emotion.as_ref().map_or(true, |e| i.emotion.as_ref() == Some(e)))
                .cloned()
                .collect();
            ideas.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(ideas
                .into_iter()
                .skip(req.skip as usize)
                .take(req.limit as usize)
                .collect())
        }

        async fn search(&self, owner: &str, query: &str) -> Result<Vec<Idea>> {
            let needle = query.to_lowercase();
            let mut ideas: Vec<Idea> = self
                .ideas
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.user_id == owner && i.content.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            ideas.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(ideas)
        }

        async fn update(
            &self,
            id: Uuid,
            owner: &str,
            req: UpdateIdeaRequest,
        ) -> Result<Option<Idea>> {
            req.validate()?;
            let mut ideas = self.ideas.lock().unwrap();
            let Some(idea) = ideas.get_mut(&id).filter(|i| i.user_id == owner) else {
                return Ok(None);
            };
            if let Some(content) = req.content {
                idea.content = content;
            }
            if let Some(project) = req.project {
                idea.project = Some(project);
            }
            if let Some(theme) = req.theme {
                idea.theme = Some(theme);
            }
            if let Some(emotion) = req.emotion {
                idea.emotion = Some(emotion);
            }
            if let Some(output) = req.transformed_output {
                idea.transformed_output = Some(output);
            }
            Ok(Some(idea.clone()))
        }

        async fn delete(&self, id: Uuid, owner: &str) -> Result<bool> {
            let mut ideas = self.ideas.lock().unwrap();
            let owned = ideas.get(&id).map(|i| i.user_id == owner).unwrap_or(false);
            if owned {
                ideas.remove(&id);
            }
            Ok(owned)
        }

        async fn stats(&self, _owner: &str) -> Result<IdeaStats> {
            Err(Error::Internal("not used in service tests".to_string()))
        }
    }
}

//! Core traits for brainvault abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// IDEA REPOSITORY
// =============================================================================

/// Repository for idea CRUD, search, and statistics.
///
/// Every operation except `insert` is owner-scoped: a row that exists but
/// belongs to another owner is reported exactly like an absent row
/// (`Ok(None)` / `Ok(false)`), never as a distinct "forbidden" outcome.
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Insert a new idea. The store assigns id and timestamp; enrichment
    /// fields start null.
    async fn insert(&self, owner: &str, req: CreateIdeaRequest) -> Result<Idea>;

    /// Fetch an idea by id for the given owner.
    async fn fetch(&self, id: Uuid, owner: &str) -> Result<Option<Idea>>;

    /// List ideas with conjunctive filters and pagination, newest first.
    async fn list(&self, owner: &str, req: ListIdeasRequest) -> Result<Vec<Idea>>;

    /// Full-text search over content, newest first.
    async fn search(&self, owner: &str, query: &str) -> Result<Vec<Idea>>;

    /// Apply a partial update. An empty partial returns the current row
    /// unchanged.
    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        req: UpdateIdeaRequest,
    ) -> Result<Option<Idea>>;

    /// Delete an idea. Returns true iff a row matching both id and owner
    /// was removed.
    async fn delete(&self, id: Uuid, owner: &str) -> Result<bool>;

    /// Per-owner statistics.
    async fn stats(&self, owner: &str) -> Result<IdeaStats>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user account records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    async fn insert(&self, req: CreateUserRequest) -> Result<User>;

    /// Fetch a user by row id.
    async fn fetch(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch a user by external auth id.
    async fn fetch_by_auth_id(&self, auth_id: &str) -> Result<Option<User>>;

    /// Apply a partial profile update.
    async fn update(&self, id: Uuid, req: UpdateUserRequest) -> Result<Option<User>>;

    /// Delete a user and (by policy) that user's ideas. Returns true iff
    /// the user row existed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Get the user for an auth id, creating the row on first contact.
    async fn get_or_create(&self, auth_id: &str, email: &str) -> Result<User>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

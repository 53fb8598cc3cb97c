//! # brainvault-db
//!
//! PostgreSQL database layer for brainvault.
//!
//! This crate provides:
//! - Connection pool management
//! - Idea and user repositories
//! - Owner-scoped full-text search with PostgreSQL tsvector
//! - Filesystem audio blob storage
//!
//! ## Example
//!
//! ```rust,ignore
//! use brainvault_db::Database;
//! use brainvault_core::{CreateIdeaRequest, IdeaRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/brainvault").await?;
//!
//!     let idea = db.ideas.insert("auth0|alice", CreateIdeaRequest {
//!         content: "Build a solar-powered birdhouse".to_string(),
//!         source: "manual".to_string(),
//!     }).await?;
//!
//!     println!("Created idea: {}", idea.id);
//!     Ok(())
//! }
//! ```

pub mod audio_storage;
pub mod ideas;
pub mod pool;
pub mod users;

// Re-export core types
pub use brainvault_core::*;

pub use audio_storage::{AudioStorageBackend, FilesystemAudioStore};
pub use ideas::PgIdeaRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use users::PgUserRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Idea repository for CRUD, search, and stats.
    pub ideas: PgIdeaRepository,
    /// User repository for account records.
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            ideas: PgIdeaRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database and build all repositories.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations from the crate's `migrations/` directory.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

//! User repository implementation.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use brainvault_core::{
    new_v7, CreateUserRequest, Error, Result, UpdateUserRequest, User, UserRepository,
};

const USER_COLUMNS: &str = "id, auth_id, email, subscription, created_at";

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build the SET clause for a partial profile update.
///
/// Parameter $1 (id) is reserved; update fields start at $2 in
/// email/subscription order. Returns None for an empty partial.
fn update_set_clause(req: &UpdateUserRequest) -> Option<String> {
    let mut updates: Vec<String> = Vec::new();
    let mut param_idx = 1;

    if req.email.is_some() {
        param_idx += 1;
        updates.push(format!("email = ${}", param_idx));
    }
    if req.subscription.is_some() {
        param_idx += 1;
        updates.push(format!("subscription = ${}", param_idx));
    }

    if updates.is_empty() {
        None
    } else {
        Some(updates.join(", "))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, req: CreateUserRequest) -> Result<User> {
        let user = User {
            id: new_v7(),
            auth_id: req.auth_id,
            email: req.email,
            subscription: req.subscription,
            created_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query(
            "INSERT INTO users (id, auth_id, email, subscription, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.auth_id)
        .bind(&user.email)
        .bind(&user.subscription)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "users",
            op = "insert",
            user_id = %user.id,
            "User created"
        );
        Ok(user)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(user)
    }

    async fn fetch_by_auth_id(&self, auth_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE auth_id = $1",
            USER_COLUMNS
        ))
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, req: UpdateUserRequest) -> Result<Option<User>> {
        let Some(set_clause) = update_set_clause(&req) else {
            return self.fetch(id).await;
        };

        let sql = format!("UPDATE users SET {} WHERE id = $1", set_clause);

        let mut query = sqlx::query(&sql).bind(id);
        if let Some(email) = &req.email {
            query = query.bind(email);
        }
        if let Some(subscription) = &req.subscription {
            query = query.bind(subscription);
        }

        let result = query.execute(&self.pool).await.map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Deleting a user cascades to that user's ideas; orphaned ideas
        // would be unreachable forever under owner-scoping.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let Some(user) = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        else {
            return Ok(false);
        };

        let removed = sqlx::query("DELETE FROM ideas WHERE user_id = $1")
            .bind(&user.auth_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "users",
            op = "delete",
            user_id = %id,
            cascaded_ideas = removed.rows_affected(),
            "User deleted"
        );
        Ok(true)
    }

    async fn get_or_create(&self, auth_id: &str, email: &str) -> Result<User> {
        if let Some(user) = self.fetch_by_auth_id(auth_id).await? {
            return Ok(user);
        }

        debug!(
            subsystem = "db",
            component = "users",
            op = "get_or_create",
            "First contact, creating user"
        );
        self.insert(CreateUserRequest {
            auth_id: auth_id.to_string(),
            email: email.to_string(),
            subscription: "free".to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_set_clause_empty() {
        assert!(update_set_clause(&UpdateUserRequest::default()).is_none());
    }

    #[test]
    fn test_update_set_clause_email_only() {
        let req = UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(update_set_clause(&req).as_deref(), Some("email = $2"));
    }

    #[test]
    fn test_update_set_clause_both_fields() {
        let req = UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            subscription: Some("pro".to_string()),
        };
        assert_eq!(
            update_set_clause(&req).as_deref(),
            Some("email = $2, subscription = $3")
        );
    }
}

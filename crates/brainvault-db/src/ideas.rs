//! Idea repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local, SubsecRound, TimeZone, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use brainvault_core::{
    new_v7, CreateIdeaRequest, Error, Idea, IdeaRepository, IdeaStats, ListIdeasRequest, Result,
    UpdateIdeaRequest,
};

const IDEA_COLUMNS: &str =
    "id, user_id, content, source, timestamp, project, theme, emotion, transformed_output";

/// PostgreSQL implementation of IdeaRepository.
///
/// Every owner-scoped statement carries `user_id = $owner` in its WHERE
/// clause, so a row belonging to another owner is indistinguishable from an
/// absent row at this layer.
pub struct PgIdeaRepository {
    pool: Pool<Postgres>,
}

impl PgIdeaRepository {
    /// Create a new PgIdeaRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// QUERY BUILDING HELPERS
// =============================================================================

/// Build the list query for the given filter combination.
///
/// Parameter layout: $1 = owner, then one parameter per present filter in
/// project/theme/emotion order, then LIMIT and OFFSET. `list` binds in the
/// same fixed order.
fn list_query_sql(req: &ListIdeasRequest) -> String {
    let mut sql = format!("SELECT {} FROM ideas WHERE user_id = $1", IDEA_COLUMNS);
    let mut param_idx = 1;

    if req.project.is_some() {
        param_idx += 1;
        sql.push_str(&format!(" AND project = ${}", param_idx));
    }
    if req.theme.is_some() {
        param_idx += 1;
        sql.push_str(&format!(" AND theme = ${}", param_idx));
    }
    if req.emotion.is_some() {
        param_idx += 1;
        sql.push_str(&format!(" AND emotion = ${}", param_idx));
    }

    // UUIDv7 ids break timestamp ties deterministically.
    sql.push_str(&format!(
        " ORDER BY timestamp DESC, id DESC LIMIT ${} OFFSET ${}",
        param_idx + 1,
        param_idx + 2
    ));
    sql
}

/// Build the SET clause for a partial update.
///
/// Parameters $1 (id) and $2 (owner) are reserved; update fields start at $3
/// in content/project/theme/emotion/transformed_output order. Returns None
/// for an empty partial.
fn update_set_clause(req: &UpdateIdeaRequest) -> Option<String> {
    let mut updates: Vec<String> = Vec::new();
    let mut param_idx = 2;

    let mut push = |updates: &mut Vec<String>, column: &str| {
        param_idx += 1;
        updates.push(format!("{} = ${}", column, param_idx));
    };

    if req.content.is_some() {
        push(&mut updates, "content");
    }
    if req.project.is_some() {
        push(&mut updates, "project");
    }
    if req.theme.is_some() {
        push(&mut updates, "theme");
    }
    if req.emotion.is_some() {
        push(&mut updates, "emotion");
    }
    if req.transformed_output.is_some() {
        push(&mut updates, "transformed_output");
    }

    if updates.is_empty() {
        None
    } else {
        Some(updates.join(", "))
    }
}

/// First instant of the current calendar month, server time zone.
fn current_month_start() -> DateTime<Utc> {
    let now = Local::now();
    Local
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[async_trait]
impl IdeaRepository for PgIdeaRepository {
    async fn insert(&self, owner: &str, req: CreateIdeaRequest) -> Result<Idea> {
        req.validate()?;

        let idea = Idea {
            id: new_v7(),
            user_id: owner.to_string(),
            content: req.content,
            source: req.source,
            // Truncated to microseconds, the timestamptz resolution, so the
            // returned value is byte-identical to a later fetch.
            timestamp: Utc::now().trunc_subsecs(6),
            project: None,
            theme: None,
            emotion: None,
            transformed_output: None,
        };

        sqlx::query(
            "INSERT INTO ideas (id, user_id, content, source, timestamp) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(idea.id)
        .bind(&idea.user_id)
        .bind(&idea.content)
        .bind(&idea.source)
        .bind(idea.timestamp)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "ideas",
            op = "insert",
            idea_id = %idea.id,
            "Idea created"
        );
        Ok(idea)
    }

    async fn fetch(&self, id: Uuid, owner: &str) -> Result<Option<Idea>> {
        let idea = sqlx::query_as::<_, Idea>(&format!(
            "SELECT {} FROM ideas WHERE id = $1 AND user_id = $2",
            IDEA_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(idea)
    }

    async fn list(&self, owner: &str, req: ListIdeasRequest) -> Result<Vec<Idea>> {
        let req = req.normalized();
        let sql = list_query_sql(&req);

        let mut query = sqlx::query_as::<_, Idea>(&sql).bind(owner);
        if let Some(project) = &req.project {
            query = query.bind(project);
        }
        if let Some(theme) = &req.theme {
            query = query.bind(theme);
        }
        if let Some(emotion) = &req.emotion {
            query = query.bind(emotion);
        }
        query = query.bind(req.limit).bind(req.skip);

        let ideas = query.fetch_all(&self.pool).await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "ideas",
            op = "list",
            result_count = ideas.len(),
            "Listed ideas"
        );
        Ok(ideas)
    }

    async fn search(&self, owner: &str, query: &str) -> Result<Vec<Idea>> {
        // Ordered by recency, not rank, to keep ordering predictable.
        let ideas = sqlx::query_as::<_, Idea>(&format!(
            "SELECT {} FROM ideas \
             WHERE user_id = $1 \
             AND to_tsvector('english', content) @@ plainto_tsquery('english', $2) \
             ORDER BY timestamp DESC, id DESC",
            IDEA_COLUMNS
        ))
        .bind(owner)
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(ideas)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        req: UpdateIdeaRequest,
    ) -> Result<Option<Idea>> {
        req.validate()?;

        let Some(set_clause) = update_set_clause(&req) else {
            // No-op partial: return the current row unchanged.
            return self.fetch(id, owner).await;
        };

        let sql = format!(
            "UPDATE ideas SET {} WHERE id = $1 AND user_id = $2",
            set_clause
        );

        let mut query = sqlx::query(&sql).bind(id).bind(owner);
        if let Some(content) = &req.content {
            query = query.bind(content);
        }
        if let Some(project) = &req.project {
            query = query.bind(project);
        }
        if let Some(theme) = &req.theme {
            query = query.bind(theme);
        }
        if let Some(emotion) = &req.emotion {
            query = query.bind(emotion);
        }
        if let Some(transformed_output) = &req.transformed_output {
            query = query.bind(transformed_output);
        }

        let result = query.execute(&self.pool).await.map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch(id, owner).await
    }

    async fn delete(&self, id: Uuid, owner: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn stats(&self, owner: &str) -> Result<IdeaStats> {
        let total_ideas: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ideas WHERE user_id = $1")
                .bind(owner)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let ideas_this_month: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ideas WHERE user_id = $1 AND timestamp >= $2",
        )
        .bind(owner)
        .bind(current_month_start())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let projects_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT project) FROM ideas WHERE user_id = $1 AND project IS NOT NULL",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let themes_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT theme) FROM ideas WHERE user_id = $1 AND theme IS NOT NULL",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let emotions_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT emotion) FROM ideas WHERE user_id = $1 AND emotion IS NOT NULL",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(IdeaStats {
            total_ideas,
            ideas_this_month,
            projects_count,
            themes_count,
            emotions_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_no_filters() {
        let req = ListIdeasRequest::default();
        let sql = list_query_sql(&req);
        assert!(sql.contains("WHERE user_id = $1"));
        assert!(!sql.contains("project"));
        assert!(sql.ends_with("ORDER BY timestamp DESC, id DESC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_list_query_single_filter() {
        let req = ListIdeasRequest {
            theme: Some("solar".to_string()),
            ..Default::default()
        };
        let sql = list_query_sql(&req);
        assert!(sql.contains("AND theme = $2"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn test_list_query_all_filters_conjunctive() {
        let req = ListIdeasRequest {
            project: Some("p".to_string()),
            theme: Some("t".to_string()),
            emotion: Some("e".to_string()),
            ..Default::default()
        };
        let sql = list_query_sql(&req);
        assert!(sql.contains("AND project = $2"));
        assert!(sql.contains("AND theme = $3"));
        assert!(sql.contains("AND emotion = $4"));
        assert!(sql.ends_with("LIMIT $5 OFFSET $6"));
    }

    #[test]
    fn test_update_set_clause_empty() {
        assert!(update_set_clause(&UpdateIdeaRequest::default()).is_none());
    }

    #[test]
    fn test_update_set_clause_single_field() {
        let req = UpdateIdeaRequest {
            transformed_output: Some("out".to_string()),
            ..Default::default()
        };
        assert_eq!(
            update_set_clause(&req).as_deref(),
            Some("transformed_output = $3")
        );
    }

    #[test]
    fn test_update_set_clause_field_order() {
        let req = UpdateIdeaRequest {
            content: Some("c".to_string()),
            emotion: Some("e".to_string()),
            transformed_output: Some("o".to_string()),
            ..Default::default()
        };
        assert_eq!(
            update_set_clause(&req).as_deref(),
            Some("content = $3, emotion = $4, transformed_output = $5")
        );
    }

    #[test]
    fn test_current_month_start_is_first_of_month() {
        let start = current_month_start().with_timezone(&Local);
        assert_eq!(start.day(), 1);
        let now = Local::now();
        assert_eq!(start.month(), now.month());
        assert!(start <= now);
    }
}

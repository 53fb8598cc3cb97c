//! Core data models for brainvault.
//!
//! These types are shared across all brainvault crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::defaults::{CONTENT_MAX_LEN, CONTENT_MIN_LEN};
use crate::error::{Error, Result};

// =============================================================================
// IDEA TYPES
// =============================================================================

/// A captured idea owned by a user.
///
/// `project`, `theme`, and `emotion` stay `None` until the enrichment
/// pipeline (or an explicit update) sets them. `transformed_output` is
/// overwritten by each transformation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Idea {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub project: Option<String>,
    pub theme: Option<String>,
    pub emotion: Option<String>,
    pub transformed_output: Option<String>,
}

/// Request for creating a new idea.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIdeaRequest {
    pub content: String,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "manual".to_string()
}

impl CreateIdeaRequest {
    /// Validate the content length bound.
    pub fn validate(&self) -> Result<()> {
        validate_content(&self.content)
    }
}

/// Validate idea content against the [CONTENT_MIN_LEN, CONTENT_MAX_LEN] bound.
///
/// Length is measured in characters, not bytes, so multi-byte content is not
/// penalized.
pub fn validate_content(content: &str) -> Result<()> {
    let len = content.chars().count();
    if len < CONTENT_MIN_LEN {
        return Err(Error::InvalidInput(
            "content must not be empty".to_string(),
        ));
    }
    if len > CONTENT_MAX_LEN {
        return Err(Error::InvalidInput(format!(
            "content exceeds {} characters",
            CONTENT_MAX_LEN
        )));
    }
    Ok(())
}

/// Partial update for an idea. Absent fields are untouched; an empty
/// partial is a valid no-op.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIdeaRequest {
    pub content: Option<String>,
    pub project: Option<String>,
    pub theme: Option<String>,
    pub emotion: Option<String>,
    pub transformed_output: Option<String>,
}

impl UpdateIdeaRequest {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.project.is_none()
            && self.theme.is_none()
            && self.emotion.is_none()
            && self.transformed_output.is_none()
    }

    /// Validate the content length bound when content is present.
    pub fn validate(&self) -> Result<()> {
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(())
    }
}

/// Filter and pagination parameters for listing ideas.
///
/// Filters are conjunctive equality matches, each optional. `limit` is
/// clamped to [1, 100] and `skip` to >= 0 by `normalized()`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIdeasRequest {
    pub project: Option<String>,
    pub theme: Option<String>,
    pub emotion: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    crate::defaults::PAGE_LIMIT
}

impl Default for ListIdeasRequest {
    fn default() -> Self {
        Self {
            project: None,
            theme: None,
            emotion: None,
            skip: 0,
            limit: crate::defaults::PAGE_LIMIT,
        }
    }
}

impl ListIdeasRequest {
    /// Clamp pagination to the documented bounds.
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.clamp(1, crate::defaults::PAGE_LIMIT_MAX);
        self.skip = self.skip.max(0);
        self
    }
}

/// Enrichment read-back view of an idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaAnalysis {
    pub id: Uuid,
    pub content: String,
    pub project: Option<String>,
    pub theme: Option<String>,
    pub emotion: Option<String>,
}

impl From<Idea> for IdeaAnalysis {
    fn from(idea: Idea) -> Self {
        Self {
            id: idea.id,
            content: idea.content,
            project: idea.project,
            theme: idea.theme,
            emotion: idea.emotion,
        }
    }
}

/// Per-owner idea statistics.
///
/// `ideas_this_month` counts from the first instant of the current calendar
/// month in server-local time, not a rolling 30-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaStats {
    pub total_ideas: i64,
    pub ideas_this_month: i64,
    pub projects_count: i64,
    pub themes_count: i64,
    pub emotions_count: i64,
}

// =============================================================================
// TRANSFORMATION TYPES
// =============================================================================

/// The closed set of transformation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Expand the idea into engaging long-form content.
    Content,
    /// Derive intellectual-property framing (patent/copyright/trademark).
    Ip,
    /// Break the idea down into actionable tasks.
    Tasks,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Content => "content",
            TransformKind::Ip => "ip",
            TransformKind::Tasks => "tasks",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to transform an idea. The owner comes from the authenticated
/// principal, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformRequest {
    pub idea_id: Uuid,
    pub output_type: TransformKind,
}

/// Result of a transformation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed_content: String,
    pub idea_id: Uuid,
    pub output_type: TransformKind,
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A user account keyed by an external identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub subscription: String,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub auth_id: String,
    pub email: String,
    #[serde(default = "default_subscription")]
    pub subscription: String,
}

fn default_subscription() -> String {
    "free".to_string()
}

/// Partial profile update for a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub subscription: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.subscription.is_none()
    }
}

/// Authenticated principal supplied by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrincipal {
    /// External identity id; the owner key on ideas.
    pub user_id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_length_one() {
        assert!(validate_content("x").is_ok());
    }

    #[test]
    fn test_validate_content_length_max() {
        let content = "a".repeat(CONTENT_MAX_LEN);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn test_validate_content_empty_fails() {
        assert!(validate_content("").is_err());
    }

    #[test]
    fn test_validate_content_over_max_fails() {
        let content = "a".repeat(CONTENT_MAX_LEN + 1);
        assert!(validate_content(&content).is_err());
    }

    #[test]
    fn test_validate_content_counts_chars_not_bytes() {
        // 10,000 three-byte chars is within the character bound.
        let content = "\u{00e9}".repeat(CONTENT_MAX_LEN);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn test_create_request_default_source() {
        let req: CreateIdeaRequest =
            serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(req.source, "manual");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_empty_partial() {
        let req = UpdateIdeaRequest::default();
        assert!(req.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_empty_content() {
        let req = UpdateIdeaRequest {
            content: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_request_normalizes_limit() {
        let req = ListIdeasRequest {
            limit: 500,
            skip: -3,
            ..Default::default()
        }
        .normalized();
        assert_eq!(req.limit, 100);
        assert_eq!(req.skip, 0);
    }

    #[test]
    fn test_list_request_normalizes_zero_limit() {
        let req = ListIdeasRequest {
            limit: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn test_transform_kind_serde_roundtrip() {
        for (kind, text) in [
            (TransformKind::Content, "\"content\""),
            (TransformKind::Ip, "\"ip\""),
            (TransformKind::Tasks, "\"tasks\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), text);
            let parsed: TransformKind = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_transform_kind_rejects_unknown() {
        let parsed = serde_json::from_str::<TransformKind>("\"poem\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_transform_kind_display() {
        assert_eq!(TransformKind::Tasks.to_string(), "tasks");
    }

    #[test]
    fn test_create_user_request_default_subscription() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"auth_id": "a1", "email": "a@b.c"}"#).unwrap();
        assert_eq!(req.subscription, "free");
    }

    #[test]
    fn test_idea_analysis_from_idea() {
        let idea = Idea {
            id: Uuid::nil(),
            user_id: "u1".to_string(),
            content: "an idea".to_string(),
            source: "manual".to_string(),
            timestamp: Utc::now(),
            project: Some("Startup Ideas".to_string()),
            theme: None,
            emotion: Some("excited".to_string()),
            transformed_output: None,
        };
        let analysis = IdeaAnalysis::from(idea.clone());
        assert_eq!(analysis.id, idea.id);
        assert_eq!(analysis.project.as_deref(), Some("Startup Ideas"));
        assert!(analysis.theme.is_none());
    }
}

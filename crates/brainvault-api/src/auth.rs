//! Authentication extractor and token-verification collaborator.
//!
//! The core treats authentication as an opaque capability: a bearer
//! credential goes in, `{user_id, email}` comes out. Issuer trust, key
//! rotation, and token formats live behind the `TokenVerifier` seam.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use brainvault_core::{AuthPrincipal, Error, Result, UserRepository};

use crate::error::ApiError;
use crate::AppState;

/// Token verification collaborator.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token and return the principal it represents.
    async fn verify(&self, token: &str) -> Result<AuthPrincipal>;
}

/// Development verifier: the token itself is the external auth id.
///
/// Rejects the empty token and the literal "invalid" so the 401 path stays
/// exercisable without a real identity provider.
pub struct DevTokenVerifier;

#[async_trait]
impl TokenVerifier for DevTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthPrincipal> {
        if token.is_empty() || token == "invalid" {
            return Err(Error::Unauthorized("Invalid token".to_string()));
        }
        Ok(AuthPrincipal {
            user_id: token.to_string(),
            email: format!("{}@dev.local", token.replace(['@', ' '], "_")),
        })
    }
}

/// Extractor for authenticated requests.
///
/// Validates the Bearer credential via the configured verifier, then
/// get-or-creates the account row (first authenticated contact creates the
/// user).
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: AuthPrincipal,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            _ => {
                return Err(ApiError::Unauthorized(
                    "Missing bearer credentials".to_string(),
                ))
            }
        };

        let principal = state
            .verifier
            .verify(token)
            .await
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        state
            .users
            .get_or_create(&principal.user_id, &principal.email)
            .await?;

        Ok(Auth { principal })
    }
}

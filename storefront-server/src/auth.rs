//! Bearer-token resolution at the HTTP boundary.
//!
//! The real verifier is the external authentication service; handlers only
//! see the [`TokenVerifier`] seam and the resolved [`UserId`]. Tokens are
//! opaque here; no claims are inspected in this crate.

use std::collections::HashMap;

use async_trait::async_trait;
use storefront::types::UserId;
use thiserror::Error;

/// Errors produced while resolving a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is unknown, malformed, or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The auth collaborator could not be reached.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a bearer token to the authenticated principal.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return the user it belongs to.
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Fixed token table for tests and development.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    /// Create an empty verifier that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as belonging to `user_id`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(AuthError::InvalidToken)
    }
}

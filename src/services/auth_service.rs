//! Domain service for authentication and user management.
//!
//! Handles registration, credential exchange for bearer tokens, and profile
//! updates performed by administrators.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::services::token::{Claims, TokenError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Token plus user summary returned by register and authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub id: i32,
    pub email: String,
    pub username: String,
    pub role: String,
}

impl AuthenticationResponse {
    #[must_use]
    pub fn new(token: String, user: &User) -> Self {
        Self {
            token,
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a `Technicien` account and returns a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Conflict`] if the email is already registered.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError>;

    /// Exchanges email and password for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if verification fails, and
    /// [`AuthError::UserNotFound`] if the verified account cannot be loaded.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, AuthError>;

    /// Overwrites username and email of an existing user.
    async fn update_user(&self, user_id: i32, username: &str, email: &str)
    -> Result<(), AuthError>;

    /// Loads the account behind an authenticated token.
    async fn current_user(&self, user_id: i32) -> Result<User, AuthError>;

    /// Verifies a bearer token and returns its claims.
    fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;
}

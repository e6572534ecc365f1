//! Authentication and authorization ports.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Role, User};
use crate::error::DomainError;

/// What a token may be used for. Each consumer accepts exactly one purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    Refresh,
    PasswordReset,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenPurpose::Access => "access",
            TokenPurpose::Refresh => "refresh",
            TokenPurpose::PasswordReset => "password_reset",
        })
    }
}

/// Verified contents of a signed token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub purpose: TokenPurpose,
    pub issuer: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenPayload {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies signed, time-bound identity tokens.
pub trait TokenMaker: Send + Sync {
    /// Sign a token for `user` valid for `duration` from now.
    fn create_token(
        &self,
        user: &User,
        purpose: TokenPurpose,
        duration: TimeDelta,
    ) -> Result<(String, TokenPayload), AuthError>;

    /// Check signature, algorithm, issuer and expiry.
    fn verify_token(&self, token: &str) -> Result<TokenPayload, AuthError>;

    fn verify_token_for(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<TokenPayload, AuthError> {
        let payload = self.verify_token(token)?;
        if payload.purpose != purpose {
            return Err(AuthError::InvalidToken(format!(
                "expected {purpose} token, got {}",
                payload.purpose
            )));
        }
        Ok(payload)
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("authorization header is missing")]
    MissingAuth,

    #[error("access to the requested resource is forbidden")]
    InsufficientPermissions,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => DomainError::Forbidden(err.to_string()),
            AuthError::Signing(_) | AuthError::HashingError(_) => {
                DomainError::Internal(err.to_string())
            }
            _ => DomainError::Unauthenticated(err.to_string()),
        }
    }
}

//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Error taxonomy shared by every layer. Each kind maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    Internal,
    Forbidden,
    Invalid,
    NotFound,
    NotImplemented,
    Authentication,
}

impl ErrorKind {
    /// Wire code used in the `status_code` field of error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Internal => "internal",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Invalid => "invalid",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::Authentication => "authentication",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::AlreadyExists => 409,
            ErrorKind::Internal => 500,
            ErrorKind::Forbidden => 403,
            ErrorKind::Invalid => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::NotImplemented => 501,
            ErrorKind::Authentication => 401,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Validation(_) => ErrorKind::Invalid,
            DomainError::Duplicate(_) => ErrorKind::AlreadyExists,
            DomainError::Unauthenticated(_) => ErrorKind::Authentication,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotImplemented(_) => ErrorKind::NotImplemented,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Constraint(String),

    #[error("{0}")]
    ForeignKey(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => DomainError::NotFound(msg),
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::ForeignKey(msg) => DomainError::Validation(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

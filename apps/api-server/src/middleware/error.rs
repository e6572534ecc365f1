//! Error handling - every failure leaves as `{status_code, message}`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use thiserror::Error;

use labtrack_core::error::{DomainError, ErrorKind, RepoError};
use labtrack_core::ports::{AuthError, JobQueueError, ReportError};
use labtrack_shared::ErrorResponse;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BadRequest(_) => ErrorKind::Invalid,
            AppError::Unauthorized(_) => ErrorKind::Authentication,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Conflict(_) => ErrorKind::AlreadyExists,
            AppError::NotImplemented(_) => ErrorKind::NotImplemented,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                ErrorResponse::new(ErrorKind::Internal, "internal server error")
            }
            other => ErrorResponse::new(other.kind(), other.to_string()),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::NotImplemented(msg) => AppError::NotImplemented(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<JobQueueError> for AppError {
    fn from(err: JobQueueError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Extractor configs that report malformed input as `invalid` in the standard body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn internal_details_are_hidden() {
        let resp = AppError::Internal("connection refused on 10.0.0.4".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status_code"], "internal");
        assert_eq!(json["message"], "internal server error");
    }

    #[test]
    fn repo_errors_map_to_kinds() {
        let cases = [
            (RepoError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (RepoError::Constraint("x".into()), StatusCode::CONFLICT),
            (RepoError::ForeignKey("x".into()), StatusCode::BAD_REQUEST),
            (RepoError::Query("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn auth_errors_map_to_kinds() {
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InsufficientPermissions).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}

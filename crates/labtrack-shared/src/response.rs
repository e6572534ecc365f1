//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

use labtrack_core::error::ErrorKind;
use labtrack_core::pagination::{Page, Pagination};

/// `{ "data": ... }` wrapper for single resources and messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { data }
    }
}

impl ApiResponse<String> {
    /// Plain confirmation such as `{"data": "password reset successful"}`.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: message.into(),
        }
    }
}

/// `{ "data": [...], "pagination": {...} }` wrapper for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            pagination: page.pagination,
        }
    }
}

/// Error body. `status_code` is the machine-readable error kind, not the HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status_code: kind.as_str().to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labtrack_core::pagination::PageRequest;

    #[test]
    fn paginated_body_shape() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2).unwrap(), 5);
        let body = serde_json::to_value(PaginatedResponse::from(page)).unwrap();

        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert_eq!(body["pagination"]["total_pages"], 3);
        assert_eq!(body["pagination"]["has_next"], true);
    }

    #[test]
    fn error_body_carries_kind() {
        let body = serde_json::to_value(ErrorResponse::new(ErrorKind::Forbidden, "nope")).unwrap();
        assert_eq!(body, serde_json::json!({ "status_code": "forbidden", "message": "nope" }));
    }
}

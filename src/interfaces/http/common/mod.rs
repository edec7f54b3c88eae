//! Common API DTOs and error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BookingError, DomainError, ReviewError};
use crate::shared::{validate_pagination, PaginatedResult, PaginationParams};

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on error
    pub data: Option<T>,
    /// Error description, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Map a domain error onto an HTTP status and error envelope.
pub fn api_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Booking(BookingError::Conflict { .. }) => StatusCode::CONFLICT,
        DomainError::Booking(_) => StatusCode::BAD_REQUEST,
        DomainError::Review(ReviewError::DuplicateReview { .. }) => StatusCode::CONFLICT,
        DomainError::Review(_) => StatusCode::BAD_REQUEST,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", e);
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

/// Page query parameters shared by list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number starting at 1. Default: 1
    pub page: Option<u32>,
    /// Items per page (1-100). Default: 50
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn params(&self) -> PaginationParams {
        validate_pagination(self.page, self.limit)
    }
}

/// Paginated list payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Convert each item of a paginated domain result.
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Listing", 3), StatusCode::NOT_FOUND),
            (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("taken".into()), StatusCode::CONFLICT),
            (BookingError::PastDate.into(), StatusCode::BAD_REQUEST),
            (
                ReviewError::DuplicateReview { booking_id: 1 }.into(),
                StatusCode::CONFLICT,
            ),
            (ReviewError::WrongReviewer.into(), StatusCode::BAD_REQUEST),
            (DomainError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, Json(body)) = api_error(err);
            assert_eq!(status, expected);
            assert!(!body.success);
            assert!(body.error.is_some());
        }
    }

    #[test]
    fn error_envelope_omits_error_on_success() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }

    #[test]
    fn pagination_query_defaults() {
        let p = PaginationQuery::default().params();
        assert_eq!(p, PaginationParams::new(1, 50));
    }
}

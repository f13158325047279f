//! REST API endpoints.
//!
//! Axum-based HTTP API for hotel and performance-record CRUD and the
//! derived analytics (metrics, rankings, composite rank report).

pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Reject mutating requests that lack the configured bearer token.
///
/// When no token is configured everything is open (local deployment
/// default). Read and analytics routes never call this.
pub fn require_write_access(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &state.api_token else {
        return Ok(());
    };

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected.as_str());

    if authorized {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Missing or invalid API token".to_string(),
        ))
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Hotel CRUD
        .route(
            "/api/hotels",
            post(routes::hotels::create_hotel).get(routes::hotels::list_hotels),
        )
        .route("/api/hotels/count", get(routes::hotels::count_hotels))
        .route(
            "/api/hotels/:id",
            get(routes::hotels::get_hotel)
                .patch(routes::hotels::update_hotel)
                .put(routes::hotels::replace_hotel)
                .delete(routes::hotels::delete_hotel),
        )
        // Hotel-scoped performance records
        .route(
            "/api/hotels/:id/performance-records",
            get(routes::performance::list_for_hotel)
                .post(routes::performance::create_for_hotel)
                .delete(routes::performance::delete_for_hotel),
        )
        // Performance record CRUD
        .route(
            "/api/performance-records",
            post(routes::performance::create_record).get(routes::performance::list_records),
        )
        .route(
            "/api/performance-records/count",
            get(routes::performance::count_records),
        )
        .route(
            "/api/performance-records/:id",
            get(routes::performance::get_record)
                .patch(routes::performance::update_record)
                .delete(routes::performance::delete_record),
        )
        // Analytics
        .route("/api/hotels/:id/adr", get(routes::analytics::hotel_adr))
        .route(
            "/api/hotels/:id/revpar",
            get(routes::analytics::hotel_rev_par),
        )
        .route(
            "/api/hotels/:id/occupancy-rate",
            get(routes::analytics::hotel_occupancy_rate),
        )
        .route(
            "/api/rankings/revpar",
            get(routes::analytics::rankings_by_rev_par),
        )
        .route(
            "/api/rankings/occupancy-rate",
            get(routes::analytics::rankings_by_occupancy_rate),
        )
        .route("/api/rankings/adr", get(routes::analytics::rankings_by_adr))
        .route(
            "/api/hotels/:id/rank/revpar",
            get(routes::analytics::rank_by_rev_par),
        )
        .route(
            "/api/hotels/:id/rank/occupancy-rate",
            get(routes::analytics::rank_by_occupancy_rate),
        )
        .route(
            "/api/hotels/:id/rank/adr",
            get(routes::analytics::rank_by_adr),
        )
        .route(
            "/api/hotels/:id/rankings",
            get(routes::analytics::hotel_rankings),
        )
        // Admin
        .route("/api/admin/migrate", post(routes::admin::migrate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_new() {
        let p = Pagination::new(Some(3), Some(25));
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_bounds() {
        // Page can't be 0
        let p = Pagination::new(Some(0), Some(50));
        assert_eq!(p.page, 1);

        // Page size max is 100
        let p = Pagination::new(Some(1), Some(200));
        assert_eq!(p.page_size, 100);
    }

    #[test]
    fn test_pagination_meta() {
        let p = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_pagination_meta_first_page() {
        let p = Pagination::new(Some(1), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_last_page() {
        let p = Pagination::new(Some(3), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }
}

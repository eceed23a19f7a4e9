use crate::app::CatalogError;
use crate::domain::FieldViolation;
use crate::transport::http::types::{ApiResponse, MSG_INVALID_QUERY, MSG_UNAVAILABLE};
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::Json;

pub type ErrorResponse = (StatusCode, Json<ApiResponse>);

/// Maps a service error onto the wire. Storage details stay in the logs.
pub fn catalog_error_response(err: CatalogError) -> ErrorResponse {
    match err {
        CatalogError::InvalidRequest(violations) => invalid_query(violations),
        CatalogError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!("Product '{}' not found", id), None)),
        ),
        CatalogError::StorageUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failure(MSG_UNAVAILABLE, None)),
        ),
    }
}

pub fn invalid_query(violations: Vec<FieldViolation>) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure(
            MSG_INVALID_QUERY,
            Some(serde_json::json!({ "errors": violations })),
        )),
    )
}

/// Query strings that fail to deserialize (non-numeric page, unknown sortBy...) are a 400,
/// not axum's default plain-text rejection.
pub fn query_rejection(err: QueryRejection) -> ErrorResponse {
    invalid_query(vec![FieldViolation::new("query", err.body_text())])
}

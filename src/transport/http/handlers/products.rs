use crate::domain::{PageQuery, PageRequest, Product, ProductPage};
use crate::transport::http::handlers::common::{catalog_error_response, invalid_query, query_rejection};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/v1/products/paged",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, description = "Invalid page, limit or sort parameters", body = ApiResponse),
        (status = 503, description = "Product store unavailable", body = ApiResponse)
    )
)]
pub async fn list_paged_handler(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return query_rejection(e).into_response(),
    };

    // Validate before touching storage.
    let request = match PageRequest::try_from(query) {
        Ok(r) => r,
        Err(violations) => return invalid_query(violations).into_response(),
    };

    match state.catalog.list_page(&request).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => catalog_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "No product with this id", body = ApiResponse),
        (status = 503, description = "Product store unavailable", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.get_product(&id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => catalog_error_response(e).into_response(),
    }
}

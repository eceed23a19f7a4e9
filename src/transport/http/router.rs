use crate::domain::{FieldViolation, Product, ProductPage, SortBy, SortOrder};
use crate::transport::http::handlers::{health, products};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Prefix the listing API is mounted under.
pub const API_PREFIX: &str = "/api/v1";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::list_paged_handler,
        products::get_product_handler
    ),
    components(schemas(ApiResponse, Product, ProductPage, FieldViolation, SortBy, SortOrder))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/products/paged", get(products::list_paged_handler))
        .route("/products/:id", get(products::get_product_handler));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .nest(API_PREFIX, api)
        .with_state(app_state)
}

use crate::transport::proxy::handlers::{health, products};
use crate::transport::proxy::types::ProxyState;
use axum::routing::get;
use axum::Router;

pub fn create_proxy_router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/products", get(products::products_handler))
        .route("/health", get(health::healthcheck_handler))
        .with_state(state)
}

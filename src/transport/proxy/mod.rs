//! Storefront-facing `/api/products` endpoint that forwards to the query service.

pub mod router;
pub mod types;
pub mod handlers {
    pub mod health;
    pub mod products;
}

pub use router::create_proxy_router;
pub use types::ProxyState;

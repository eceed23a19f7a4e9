// src/bin/api_server.rs

use product_catalog::infra::{config, telemetry};
use product_catalog::transport;
use product_catalog::{CatalogService, PgProductStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    // --- Storage Initialization ---
    let max_connections = config::db_max_connections()?;
    tracing::info!(max_connections, "connecting product store");
    let store = PgProductStore::connect(&config::database_url()?, max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!("product store ready (products table ensured)");

    // --- Service Initialization ---
    let catalog = CatalogService::new(Arc::new(store.clone()));
    let app_state = transport::http::AppState::new(catalog);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        paged = %format!("{}/products/paged", transport::http::API_PREFIX),
        "API server listening (Swagger UI at /swagger-ui)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    store.close().await;
    tracing::info!("product store closed; graceful shutdown complete");
    Ok(())
}

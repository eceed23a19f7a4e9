// src/bin/storefront_proxy.rs

use product_catalog::infra::{config, telemetry};
use product_catalog::transport::proxy::{create_proxy_router, ProxyState};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let upstream = config::upstream_url();
    let client = reqwest::Client::builder()
        .timeout(config::upstream_timeout()?)
        .build()?;
    let state = ProxyState::new(client, &upstream);

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = create_proxy_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_addr = config::proxy_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, upstream = %upstream, "storefront proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

// src/bin/preflight.rs

use product_catalog::infra::{config, telemetry};
use product_catalog::{PgProductStore, ProductStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!(
            "Usage: cargo run --bin preflight\n\
             \n\
             Requires env vars:\n\
               DATABASE_URL\n"
        );
        std::process::exit(2);
    }

    // Force-read config (nice error messages if missing)
    let database_url = config::database_url()?;
    let max_connections = config::db_max_connections()?;
    tracing::info!(
        max_connections,
        bind_addr = %config::bind_addr(),
        upstream = %config::upstream_url(),
        "preflight: configuration"
    );

    let store = PgProductStore::connect(&database_url, max_connections).await?;
    store.ping().await?;
    tracing::info!("preflight: database reachable");

    let table: Option<String> = sqlx::query_scalar("SELECT to_regclass('public.products')::text")
        .fetch_one(store.pool())
        .await?;
    match table {
        Some(_) => {
            let total = store.count().await?;
            tracing::info!(total, "preflight: products table present");
            if total == 0 {
                tracing::warn!("preflight: products table is empty; run `cargo run --bin seed`");
            }
        }
        None => {
            tracing::warn!("preflight: products table missing; api_server creates it on startup");
        }
    }

    store.close().await;
    tracing::info!("preflight: OK");
    Ok(())
}

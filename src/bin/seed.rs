// src/bin/seed.rs

use product_catalog::infra::{config, telemetry};
use product_catalog::storage::catalog::seed::demo_products;
use product_catalog::PgProductStore;

const DEFAULT_SEED: u64 = 42;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin seed -- [--reset] [--count N] [--seed S]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           SEED_PRODUCTS (default 500, overridden by --count)\n"
    );
    std::process::exit(2);
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .map(|i| args.get(i + 1).cloned().unwrap_or_else(|| usage_and_exit()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let reset = args.iter().any(|a| a == "--reset");
    let count = match flag_value(&args, "--count") {
        Some(v) => v.parse::<usize>().map_err(|_| anyhow::anyhow!("--count must be a number"))?,
        None => config::seed_products()?,
    };
    let seed = match flag_value(&args, "--seed") {
        Some(v) => v.parse::<u64>().map_err(|_| anyhow::anyhow!("--seed must be a number"))?,
        None => DEFAULT_SEED,
    };

    let store = PgProductStore::connect(&config::database_url()?, config::db_max_connections()?).await?;
    store.ensure_schema().await?;
    if reset {
        store.clear().await?;
        tracing::info!("products table truncated");
    }

    let products = demo_products(count, seed);
    let written = store.insert_products(&products).await?;
    tracing::info!(count, seed, written, "demo catalogue written");

    store.close().await;
    Ok(())
}

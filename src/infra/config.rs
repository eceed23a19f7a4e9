//! Centralized configuration (environment variables + defaults).
//!
//! Binaries call `dotenv::dotenv().ok()` before reading any of these.

use std::str::FromStr;
use std::time::Duration;

fn var_or<T: FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))
}

/// Maximum pooled database connections (default 5).
pub fn db_max_connections() -> anyhow::Result<u32> {
    Ok(var_or("DB_MAX_CONNECTIONS", 5u32)?.max(1))
}

/// Listen address of the query service.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Listen address of the storefront proxy.
pub fn proxy_bind_addr() -> String {
    std::env::var("PROXY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string())
}

/// Root URL of the query service, as seen by the proxy (no API prefix).
pub fn upstream_url() -> String {
    std::env::var("UPSTREAM_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
}

/// Request timeout for proxied calls.
pub fn upstream_timeout() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(var_or("UPSTREAM_TIMEOUT_SECS", 10u64)?.max(1)))
}

/// Base URL of the storefront proxy, used by the browse client.
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://127.0.0.1:3001".to_string())
}

/// Number of demo products written by the seeder.
pub fn seed_products() -> anyhow::Result<usize> {
    var_or("SEED_PRODUCTS", 500usize)
}

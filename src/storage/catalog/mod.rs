//! Product storage backends.

use crate::domain::{Product, Sort};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Read access to the product table.
///
/// Every implementation orders windows by `(sort column, direction)` and then by `id`
/// ascending, so that consecutive windows over an unchanged table never repeat or skip a row.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Total number of products.
    async fn count(&self) -> anyhow::Result<u64>;

    /// Rows `[offset, offset + limit)` under `sort`.
    async fn fetch_window(&self, sort: Sort, offset: u64, limit: u32) -> anyhow::Result<Vec<Product>>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Product>>;

    /// Connectivity check.
    async fn ping(&self) -> anyhow::Result<()>;
}

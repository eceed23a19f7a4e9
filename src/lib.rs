pub mod app;
pub mod client;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogError, CatalogService};
pub use client::{FeedController, HttpPageSource, PageSource};
pub use domain::{PageRequest, Price, Product, ProductPage, Sort, SortBy, SortOrder};
pub use storage::{MemoryProductStore, PgProductStore, ProductStore};

pub mod catalog;

pub use catalog::{MemoryProductStore, PgProductStore, ProductStore};

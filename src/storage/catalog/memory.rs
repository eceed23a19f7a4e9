//! In-process product store. Names and ids compare by bytes, as `COLLATE "C"` does in Postgres.

use crate::domain::{Product, Sort, SortBy, SortOrder};
use crate::storage::catalog::ProductStore;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

/// Vector-backed store. `set_available(false)` makes every call fail as if the
/// database were unreachable.
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
    available: AtomicBool,
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryProductStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, AtomicOrdering::SeqCst);
    }

    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.available.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow::anyhow!("memory store marked unavailable"))
        }
    }
}

/// Total order used for paging: sort key in the requested direction, then id ascending.
pub fn compare_products(a: &Product, b: &Product, sort: Sort) -> Ordering {
    let primary = match sort.by {
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Price => a.price.cmp(&b.price),
    };
    let primary = match sort.order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn count(&self) -> anyhow::Result<u64> {
        self.check_available()?;
        Ok(self.products.read().await.len() as u64)
    }

    async fn fetch_window(&self, sort: Sort, offset: u64, limit: u32) -> anyhow::Result<Vec<Product>> {
        self.check_available()?;
        let mut rows = self.products.read().await.clone();
        rows.sort_by(|a, b| compare_products(a, b, sort));
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit as usize).collect())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Product>> {
        self.check_available()?;
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Price;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price: Price::from_cents(cents),
            image_url: None,
            category: None,
            stock: Some(1),
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn ties_are_broken_by_id_in_both_directions() {
        let store = MemoryProductStore::new(vec![
            product("c", "Same", 100),
            product("a", "Same", 100),
            product("b", "Other", 300),
        ]);

        let asc = store
            .fetch_window(Sort::new(SortBy::Price, SortOrder::Asc), 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(&asc), vec!["a", "c", "b"]);

        let desc = store
            .fetch_window(Sort::new(SortBy::Price, SortOrder::Desc), 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(&desc), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn window_past_the_end_is_empty() {
        let store = MemoryProductStore::new(vec![product("a", "A", 1)]);
        let rows = store.fetch_window(Sort::default(), 5, 10).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryProductStore::new(vec![product("a", "A", 1)]);
        store.set_available(false);
        assert!(store.count().await.is_err());
        assert!(store.ping().await.is_err());
        store.set_available(true);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_replaces_by_id() {
        let store = MemoryProductStore::default();
        store.insert(product("a", "Old", 1)).await;
        store.insert(product("a", "New", 2)).await;
        let found = store.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(found.name, "New");
        assert_eq!(store.count().await.unwrap(), 1);
    }
}

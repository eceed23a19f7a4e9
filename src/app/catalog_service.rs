//! The Pagination Query Service.
//!
//! Sits between the HTTP layer and the product store. It is responsible for:
//! 1.  Turning a validated `PageRequest` into an offset window over the store.
//! 2.  Reading the total count and the window as two independent, concurrent reads.
//! 3.  Deriving `hasNextPage` / `nextPage` from the total.
//!
//! The service never writes and never retries; storage failures are reported as
//! `CatalogError::StorageUnavailable` and the caller decides what to do.

use crate::app::error::CatalogError;
use crate::domain::{PageRequest, Product, ProductPage};
use crate::storage::ProductStore;
use std::sync::Arc;

pub struct CatalogService {
    store: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    /// Returns one page of products under the request's sort.
    pub async fn list_page(&self, request: &PageRequest) -> Result<ProductPage, CatalogError> {
        let offset = request.offset();

        // No transaction: a catalog tolerates the count drifting slightly from the window.
        let (total, items) = tokio::try_join!(
            self.store.count(),
            self.store.fetch_window(request.sort(), offset, request.limit())
        )
        .map_err(storage_failure)?;

        tracing::debug!(
            page = request.page(),
            limit = request.limit(),
            sort = %request.sort(),
            returned = items.len(),
            total,
            "listed product page"
        );

        Ok(ProductPage::assemble(request, items, total))
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::invalid("id", "must not be empty"));
        }
        self.store
            .find_by_id(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub async fn ping(&self) -> Result<(), CatalogError> {
        self.store.ping().await.map_err(storage_failure)
    }
}

fn storage_failure(err: anyhow::Error) -> CatalogError {
    tracing::error!(error = %format!("{:#}", err), "product store request failed");
    CatalogError::StorageUnavailable(err)
}

//! Where the fetch controller gets its pages from.

use crate::app::{CatalogError, CatalogService};
use crate::domain::{PageRequest, ProductPage, Sort};
use crate::transport::http::ApiResponse;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Unvalidated page parameters as the storefront sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
    pub sort: Sort,
}

/// Client-side fetch failures. None of them discard the items already loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),
}

impl FetchError {
    /// Whether repeating the same request can succeed.
    ///
    /// Network failures and 408/429/5xx are transient. Other statuses and malformed bodies
    /// come back the same way on every attempt, so the view should not offer a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => {
                matches!(*status, 408 | 429) || (500..=599).contains(status)
            }
            FetchError::UnexpectedResponseShape(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> FetchError {
        FetchError::Status {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn transient_failures_are_retryable() {
        assert!(FetchError::Network("connection refused".into()).is_retryable());
        assert!(status(502).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
    }

    #[test]
    fn client_errors_and_bad_bodies_are_not() {
        assert!(!status(400).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!FetchError::UnexpectedResponseShape("missing field".into()).is_retryable());
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
        (**self).fetch_page(params).await
    }
}

/// Fetches pages from the storefront proxy's `GET /api/products`.
#[derive(Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPageSource {
    /// `base_url` is the storefront root, e.g. `http://127.0.0.1:3001`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/products", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
        let query = [
            ("page", params.page.to_string()),
            ("pageSize", params.page_size.to_string()),
            ("sortBy", params.sort.by.as_str().to_string()),
            ("sortOrder", params.sort.order.as_str().to_string()),
        ];

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            // Prefer the service's own message when the body is an ApiResponse.
            let message = serde_json::from_slice::<ApiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<ProductPage>(&body)
            .map_err(|e| FetchError::UnexpectedResponseShape(e.to_string()))
    }
}

/// In-process source: the service validates and serves the page directly.
#[async_trait]
impl PageSource for CatalogService {
    async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
        let request = PageRequest::new(params.page, params.page_size, params.sort)
            .map_err(CatalogError::from)
            .map_err(catalog_to_fetch)?;
        self.list_page(&request).await.map_err(catalog_to_fetch)
    }
}

fn catalog_to_fetch(err: CatalogError) -> FetchError {
    let status = match err {
        CatalogError::InvalidRequest(_) => 400,
        CatalogError::NotFound(_) => 404,
        CatalogError::StorageUnavailable(_) => 503,
    };
    FetchError::Status {
        status,
        message: err.to_string(),
    }
}

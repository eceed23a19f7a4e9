use crate::transport::http::API_PREFIX;

#[derive(Clone)]
pub struct ProxyState {
    pub client: reqwest::Client,
    /// `{upstream}/api/v1/products/paged`
    pub paged_url: String,
    /// `{upstream}/health`
    pub health_url: String,
}

impl ProxyState {
    /// `upstream_root` is the query service root, e.g. `http://127.0.0.1:3000`.
    pub fn new(client: reqwest::Client, upstream_root: &str) -> Self {
        let root = upstream_root.trim_end_matches('/');
        Self {
            client,
            paged_url: format!("{}{}/products/paged", root, API_PREFIX),
            health_url: format!("{}/health", root),
        }
    }
}

/// Maps storefront query parameters onto the query service's names.
///
/// `pageSize` becomes `limit`; `page`, `sortBy` and `sortOrder` pass through verbatim. Values are
/// not checked here: the query service is the one place that bounds them. Unknown keys, and a
/// client-supplied `limit`, are dropped.
pub fn translate_params(params: Vec<(String, String)>) -> Vec<(String, String)> {
    params
        .into_iter()
        .filter_map(|(key, value)| match key.as_str() {
            "pageSize" => Some(("limit".to_string(), value)),
            "page" | "sortBy" | "sortOrder" => Some((key, value)),
            _ => None,
        })
        .collect()
}

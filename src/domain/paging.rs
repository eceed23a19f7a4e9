//! Page requests, sort specs and the page envelope returned by the listing endpoint.
//!
//! `PageRequest` can only be obtained through validation, which makes the query service the
//! single authority on page and page-size bounds.

use crate::domain::product::Product;
use crate::domain::validation::{violations_from_report, FieldViolation};
use garde::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;
/// Upper bound on page size. Keep in sync with the `garde` range on `PageQuery::limit`.
pub const MAX_LIMIT: u32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
}

impl SortBy {
    /// Column the store orders by.
    pub fn column(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.column()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort field plus direction. Ties are always broken by product id ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sort {
    pub by: SortBy,
    pub order: SortOrder,
}

impl Sort {
    pub const fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.by.as_str(), self.order.as_str())
    }
}

impl FromStr for Sort {
    type Err = String;

    /// Parses `name`, `price:desc`, `name:asc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (by, order) = s.split_once(':').unwrap_or((s, "asc"));
        let by = match by.trim().to_lowercase().as_str() {
            "name" => SortBy::Name,
            "price" => SortBy::Price,
            other => return Err(format!("unknown sort field '{}' (expected name|price)", other)),
        };
        let order = match order.trim().to_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            other => return Err(format!("unknown sort order '{}' (expected asc|desc)", other)),
        };
        Ok(Sort { by, order })
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE as i64
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT as i64
}

/// Raw query string of `GET /products/paged`.
///
/// Numbers are parsed as signed so that `limit=-1` reaches validation instead of failing
/// deserialization with an opaque message.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number.
    #[garde(range(min = 1, max = 4294967295))]
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: i64,
    /// Page size.
    #[garde(range(min = 1, max = 200))]
    #[serde(default = "default_limit")]
    #[param(default = 50, minimum = 1, maximum = 200)]
    pub limit: i64,
    #[garde(skip)]
    #[serde(default)]
    #[param(inline)]
    pub sort_by: SortBy,
    #[garde(skip)]
    #[serde(default)]
    #[param(inline)]
    pub sort_order: SortOrder,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    sort: Sort,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32, sort: Sort) -> Result<Self, Vec<FieldViolation>> {
        PageQuery {
            page: page as i64,
            limit: limit as i64,
            sort_by: sort.by,
            sort_order: sort.order,
        }
        .try_into()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = Vec<FieldViolation>;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        query.validate().map_err(|report| violations_from_report(&report))?;
        // Both values are range-checked above.
        Ok(PageRequest {
            page: query.page as u32,
            limit: query.limit as u32,
            sort: Sort::new(query.sort_by, query.sort_order),
        })
    }
}

/// True when rows remain past the window `[offset, offset + limit)`.
pub fn has_next_page(offset: u64, limit: u32, total: u64) -> bool {
    offset + (limit as u64) < total
}

/// One page of products plus the totals the client needs to keep paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub has_next_page: bool,
    pub next_page: Option<u32>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl ProductPage {
    pub fn assemble(request: &PageRequest, items: Vec<Product>, total: u64) -> Self {
        let has_next = has_next_page(request.offset(), request.limit(), total);
        ProductPage {
            items,
            has_next_page: has_next,
            next_page: has_next.then(|| request.page() + 1),
            page: request.page(),
            page_size: request.limit(),
            total,
        }
    }
}

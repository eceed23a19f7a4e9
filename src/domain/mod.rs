//! Domain types for the product listing: products, prices, page requests and page envelopes.

pub mod paging;
pub mod product;
pub mod validation;

pub use paging::{
    has_next_page, PageQuery, PageRequest, ProductPage, Sort, SortBy, SortOrder, DEFAULT_LIMIT,
    DEFAULT_PAGE, MAX_LIMIT,
};
pub use product::{ParsePriceError, Price, Product};
pub use validation::FieldViolation;

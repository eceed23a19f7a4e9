//! Storefront side of the listing: page sources and the incremental fetch controller.

pub mod controller;
pub mod source;

pub use controller::{FeedController, FeedPhase, FeedSnapshot, FeedView, LoadOutcome};
pub use source::{FetchError, HttpPageSource, PageParams, PageSource};

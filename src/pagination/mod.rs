//! Pagination module
//!
//! Fetches single pages of a logical query.
//!
//! # Overview
//!
//! Two tiers keep page-count discovery separate from worker fetches:
//! - [`PageFetcher::first_page`] issues the query untouched and returns the
//!   records together with the paging metadata
//! - [`PageFetcher::page`] overlays `page = N` on the base query and returns
//!   only the records of that page

mod fetcher;
mod types;

pub use fetcher::PageFetcher;
pub use types::FirstPage;

#[cfg(test)]
mod tests;

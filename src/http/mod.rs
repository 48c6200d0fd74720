//! HTTP client module
//!
//! Provides the transport that issues one GET per page against the ODM
//! endpoints and hands the body to the envelope decoder.
//!
//! # Features
//!
//! - **Authentication**: RapidAPI host/key headers via the auth module
//! - **Error Classification**: network failures, non-success statuses and
//!   malformed bodies each map to a distinct error carrying resource and page
//! - **No Retries**: a failed request fails the page immediately
//!
//! The [`Transport`] trait is the seam the page fetcher depends on, so the
//! fan-out engine can be driven by stub transports in tests.

mod client;
mod transport;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, DEFAULT_BASE_URL,
};
pub use transport::{page_of, Transport};

//! Transport trait

use crate::decode::ResponseEnvelope;
use crate::error::Result;
use crate::types::{Query, ResourceKind, PAGE_PARAM};
use async_trait::async_trait;

/// Issues one request for a resource kind and returns the parsed envelope
///
/// Implementations must not retry and must not return partial envelopes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch one page described by `query`
    async fn fetch(&self, resource: ResourceKind, query: &Query) -> Result<ResponseEnvelope>;
}

/// Page number a query addresses (1 when it carries no `page`)
pub fn page_of(query: &Query) -> u32 {
    query
        .get(PAGE_PARAM)
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
}

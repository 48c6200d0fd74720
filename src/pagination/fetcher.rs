//! Page fetcher implementation

use super::types::FirstPage;
use crate::decode::Paging;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{Query, Record, ResourceKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches single pages through a [`Transport`]
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
}

impl PageFetcher {
    /// Create a fetcher over a shared transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a fetcher that owns its transport
    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self::new(Arc::new(transport))
    }

    /// Fetch the first page with `query` as given
    ///
    /// Returns the page's records together with the page count that drives
    /// the rest of the fetch.
    pub async fn first_page(&self, resource: ResourceKind, query: &Query) -> Result<FirstPage> {
        let envelope = self.transport.fetch(resource, query).await?;
        let paging = envelope.paging;
        let records = envelope.into_records();

        debug!(
            "{resource} page {}/{}: {} records",
            paging.current_page,
            paging.number_of_pages,
            records.len()
        );
        Ok(FirstPage { records, paging })
    }

    /// Fetch page `page` of `base`
    ///
    /// `page` overrides any `page` parameter already present in `base`.
    /// `total` is the page count reported with page 1; a page answering
    /// with different paging is logged and kept. Failures propagate
    /// unchanged.
    pub async fn page(
        &self,
        resource: ResourceKind,
        base: &Query,
        page: u32,
        total: u32,
    ) -> Result<Vec<Record>> {
        let query = base.with_page(page);
        let envelope = self.transport.fetch(resource, &query).await?;
        check_paging(resource, page, total, &envelope.paging);

        let records = envelope.into_records();
        debug!("{resource} page {page}: {} records", records.len());
        Ok(records)
    }
}

/// Compare a page's paging with what was requested; `false` on any drift
pub(super) fn check_paging(
    resource: ResourceKind,
    page: u32,
    total: u32,
    paging: &Paging,
) -> bool {
    let mut consistent = true;
    if paging.current_page != page {
        warn!(
            "{resource} page {page} answered as page {}",
            paging.current_page
        );
        consistent = false;
    }
    if paging.number_of_pages != total {
        warn!(
            "{resource} page {page} reports {} pages, page 1 reported {total}",
            paging.number_of_pages
        );
        consistent = false;
    }
    consistent
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher").finish_non_exhaustive()
    }
}

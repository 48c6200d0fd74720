//! Partition types

use super::split::split_pages;
use crate::types::{Query, ResourceKind};
use std::sync::Arc;

/// Pages assigned to one worker
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerTask {
    /// Worker index, in chunk order
    pub id: usize,
    /// Resource kind to fetch
    pub resource: ResourceKind,
    /// Base query shared read-only by all workers
    pub query: Arc<Query>,
    /// Pages to fetch, ascending
    pub pages: Vec<u32>,
}

impl WorkerTask {
    /// Plan one task per non-empty chunk of `pages`
    pub fn plan(
        resource: ResourceKind,
        query: &Arc<Query>,
        pages: &[u32],
        workers: usize,
    ) -> Vec<Self> {
        split_pages(pages, workers)
            .into_iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(id, pages)| Self {
                id,
                resource,
                query: Arc::clone(query),
                pages,
            })
            .collect()
    }

    /// Number of pages assigned
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages are assigned
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

//! Page splitting and worker sizing

use std::thread;

/// Split `pages` into exactly `workers` contiguous chunks
///
/// Earlier chunks are one page larger when the count does not divide
/// evenly. A worker count of zero is treated as one.
pub fn split_pages(pages: &[u32], workers: usize) -> Vec<Vec<u32>> {
    let workers = workers.max(1);
    let base = pages.len() / workers;
    let extra = pages.len() % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let size = base + usize::from(i < extra);
        chunks.push(pages[start..start + size].to_vec());
        start += size;
    }
    chunks
}

/// Processing units reported by the OS, at least one
pub fn default_parallelism() -> usize {
    thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Number of workers for a fetch
///
/// One when `parallel` is off. Otherwise `limit` when given, else the
/// available parallelism; never below one.
pub fn worker_count(parallel: bool, limit: Option<usize>) -> usize {
    if !parallel {
        return 1;
    }
    limit.unwrap_or_else(default_parallelism).max(1)
}

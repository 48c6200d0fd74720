//! Partition module
//!
//! Splits the pages left after page 1 into contiguous chunks, one per
//! worker.
//!
//! # Overview
//!
//! Chunking follows array-split semantics: `n` pages over `w` workers give
//! `n % w` chunks of `n / w + 1` pages followed by chunks of `n / w` pages.
//! Chunks may be empty when there are fewer pages than workers; empty
//! chunks produce no [`WorkerTask`].

mod split;
mod types;

pub use split::{default_parallelism, split_pages, worker_count};
pub use types::WorkerTask;

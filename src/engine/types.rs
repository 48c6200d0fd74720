//! Engine types
//!
//! Configuration, lifecycle phases and statistics for the fetch engine.

use std::fmt;

/// Configuration for one fetch
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Fetch pages 2..N with multiple workers
    pub parallel: bool,
    /// Report "page X/Y" progress to the user-facing stream
    pub verbose: bool,
    /// Worker limit when `parallel` is on (default: available parallelism)
    pub workers: Option<usize>,
}

impl FetchConfig {
    /// Create a new fetch config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the multi-worker path
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable progress reporting
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Cap the number of workers used when `parallel` is on
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}

/// Lifecycle of one fetch
///
/// `Init -> FetchingFirstPage -> Done` for single-page queries and queries
/// that name a page, otherwise
/// `Init -> FetchingFirstPage -> Dispatching -> AwaitingWorkers -> Merging -> Done`.
/// Any failed fetch ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing started
    #[default]
    Init,
    /// Waiting for page 1 and the page count
    FetchingFirstPage,
    /// Partitioning remaining pages and starting workers
    Dispatching,
    /// Workers running
    AwaitingWorkers,
    /// Assembling the dataset
    Merging,
    /// Dataset returned
    Done,
    /// A page fetch failed
    Failed,
}

impl FetchPhase {
    /// Whether no further transition can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::FetchingFirstPage => "fetching-first-page",
            Self::Dispatching => "dispatching",
            Self::AwaitingWorkers => "awaiting-workers",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Statistics from one fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Pages reported by the provider
    pub number_of_pages: u32,
    /// Pages fetched successfully
    pub pages_fetched: usize,
    /// Records fetched
    pub records_fetched: usize,
    /// Workers dispatched for pages 2..N (0 on the sequential and single-page paths)
    pub workers_used: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl FetchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fetched page
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

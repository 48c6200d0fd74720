//! Execution engine module
//!
//! Page-count discovery and fan-out over the remaining pages.
//!
//! # Overview
//!
//! The engine module provides:
//! - `FetchEngine` - fetches page 1, then pages 2..N sequentially or across
//!   a bounded set of workers, and assembles every page into one `Dataset`
//! - `FetchConfig` - parallel / verbose / worker limit
//! - `FetchPhase` and `FetchStats` - lifecycle and counters of the last fetch
//!
//! # Ordering
//!
//! Page 1 rows come first. Each worker fetches its pages in ascending order
//! and hands back one fragment; fragments are appended in the order workers
//! finish. Rows of one page are always contiguous, but callers must not
//! rely on rows following provider page order on the parallel path.
//!
//! # Failure
//!
//! The first failed page fails the whole fetch; no partial dataset is ever
//! returned. On the parallel path the remaining workers are aborted as soon
//! as one fails.

mod progress;
mod types;

pub use progress::Progress;
pub use types::{FetchConfig, FetchPhase, FetchStats};

use crate::error::{Error, Result};
use crate::output::{assemble, Dataset};
use crate::pagination::{FirstPage, PageFetcher};
use crate::partition::{worker_count, WorkerTask};
use crate::types::{Query, Record, ResourceKind};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Fan-out fetch engine
pub struct FetchEngine {
    /// Page fetcher shared with workers
    fetcher: PageFetcher,
    /// Fetch configuration
    config: FetchConfig,
    /// Verbose output sink
    progress: Progress,
    /// Phase of the current or last fetch
    phase: FetchPhase,
    /// Statistics of the current or last fetch
    stats: FetchStats,
}

impl FetchEngine {
    /// Create a new engine
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            config: FetchConfig::default(),
            progress: Progress::default(),
            phase: FetchPhase::Init,
            stats: FetchStats::default(),
        }
    }

    /// Set fetch configuration
    #[must_use]
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Send verbose output somewhere other than stdout
    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Get the fetch configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Phase of the current or last fetch
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Statistics of the last fetch
    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    /// Fetch every page of `query` and assemble one dataset
    ///
    /// `query` is sent untouched for the first request; later pages overlay
    /// `page`. A query that already addresses a page other than 1 returns
    /// that page alone.
    pub async fn fetch_all(&mut self, resource: ResourceKind, query: &Query) -> Result<Dataset> {
        let start = Instant::now();
        self.stats = FetchStats::new();
        self.phase = FetchPhase::Init;

        let result = self.run(resource, query).await;

        self.enter(if result.is_ok() {
            FetchPhase::Done
        } else {
            FetchPhase::Failed
        });
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        match &result {
            Ok(dataset) => info!(
                "Fetched {} {resource} records ({} columns) from {} pages in {}ms",
                dataset.len(),
                dataset.columns().len(),
                self.stats.pages_fetched,
                self.stats.duration_ms
            ),
            Err(e) => warn!("Fetching {resource} failed: {e}"),
        }
        result
    }

    async fn run(&mut self, resource: ResourceKind, query: &Query) -> Result<Dataset> {
        self.enter(FetchPhase::FetchingFirstPage);
        let first = self.fetcher.first_page(resource, query).await?;
        let total = first.number_of_pages();
        self.stats.number_of_pages = total;
        self.stats.add_page(first.records.len());

        let workers = worker_count(self.config.parallel, self.config.workers);
        if self.config.parallel {
            self.report(format_args!("{workers} workers used"));
        }

        if !first.is_page_one() {
            info!(
                "{resource} query addresses page {} of {total}; returning that page only",
                first.paging.current_page
            );
            return Ok(assemble([first.records]));
        }
        if first.is_single_page() {
            return Ok(assemble([first.records]));
        }

        if self.config.verbose {
            self.progress.page(1, total);
        }

        self.enter(FetchPhase::Dispatching);
        let remaining = first.remaining_pages();
        let fragments = if workers == 1 {
            self.fetch_sequential(resource, query, &remaining, total)
                .await?
        } else {
            self.fetch_concurrent(resource, query, &remaining, total, workers)
                .await?
        };

        Ok(self.merge(first, fragments))
    }

    /// Fetch `pages` one after another in the calling task
    async fn fetch_sequential(
        &mut self,
        resource: ResourceKind,
        query: &Query,
        pages: &[u32],
        total: u32,
    ) -> Result<Vec<Vec<Record>>> {
        self.enter(FetchPhase::AwaitingWorkers);
        debug!("Fetching {} {resource} pages sequentially", pages.len());

        let mut fragments = Vec::with_capacity(pages.len());
        for &page in pages {
            if self.config.verbose {
                self.progress.page(page, total);
            }
            let records = self.fetcher.page(resource, query, page, total).await?;
            self.stats.add_page(records.len());
            fragments.push(records);
        }
        Ok(fragments)
    }

    /// Fetch `pages` across up to `workers` tasks
    ///
    /// Fragments come back over a channel drained once every worker joined,
    /// so the returned order is worker completion order.
    async fn fetch_concurrent(
        &mut self,
        resource: ResourceKind,
        query: &Query,
        pages: &[u32],
        total: u32,
        workers: usize,
    ) -> Result<Vec<Vec<Record>>> {
        let query = Arc::new(query.clone());
        let tasks = WorkerTask::plan(resource, &query, pages, workers);
        self.stats.workers_used = tasks.len();
        info!(
            "Fetching {resource} pages 2..={total} with {} workers",
            tasks.len()
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut set = JoinSet::new();
        for task in tasks {
            let worker = Worker {
                fetcher: self.fetcher.clone(),
                progress: self.config.verbose.then(|| self.progress.clone()),
                total,
                fragments: tx.clone(),
            };
            set.spawn(worker.run(task));
        }
        drop(tx);

        self.enter(FetchPhase::AwaitingWorkers);
        while let Some(joined) = set.join_next().await {
            let failure = match joined {
                Ok(Ok(summary)) => {
                    debug!(
                        "Worker {} finished {} pages ({} records)",
                        summary.id, summary.pages, summary.records
                    );
                    self.stats.pages_fetched += summary.pages;
                    self.stats.records_fetched += summary.records;
                    continue;
                }
                Ok(Err(e)) => e,
                Err(join_error) => Error::Worker(join_error),
            };

            warn!("Aborting {} outstanding workers: {failure}", set.len());
            set.shutdown().await;
            return Err(failure);
        }

        let mut fragments = Vec::new();
        while let Some(fragment) = rx.recv().await {
            fragments.push(fragment);
        }
        Ok(fragments)
    }

    fn merge(&mut self, first: FirstPage, fragments: Vec<Vec<Record>>) -> Dataset {
        self.enter(FetchPhase::Merging);
        assemble(std::iter::once(first.records).chain(fragments))
    }

    fn enter(&mut self, phase: FetchPhase) {
        debug!("Fetch phase: {} -> {phase}", self.phase);
        self.phase = phase;
    }

    fn report(&self, message: impl std::fmt::Display) {
        if self.config.verbose {
            self.progress.line(message);
        }
    }
}

impl std::fmt::Debug for FetchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEngine")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// What one worker reports back on success
struct WorkerSummary {
    id: usize,
    pages: usize,
    records: usize,
}

/// One fan-out worker
struct Worker {
    fetcher: PageFetcher,
    progress: Option<Progress>,
    total: u32,
    fragments: mpsc::UnboundedSender<Vec<Record>>,
}

impl Worker {
    /// Fetch the task's pages in order and send them as one fragment
    async fn run(self, task: WorkerTask) -> Result<WorkerSummary> {
        let mut fragment = Vec::new();
        for &page in &task.pages {
            if let Some(progress) = &self.progress {
                progress.page(page, self.total);
            }
            let records = self
                .fetcher
                .page(task.resource, &task.query, page, self.total)
                .await?;
            fragment.extend(records);
        }

        let summary = WorkerSummary {
            id: task.id,
            pages: task.pages.len(),
            records: fragment.len(),
        };
        // The receiver lives until every worker has joined
        let _ = self.fragments.send(fragment);
        Ok(summary)
    }
}

//! User-facing progress reporting
//!
//! Lines go to one shared sink behind a mutex so concurrent workers never
//! interleave partial lines.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::warn;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Shared progress sink
#[derive(Clone)]
pub struct Progress {
    sink: Sink,
}

impl Progress {
    /// Report to standard output
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    /// Report to an arbitrary writer
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Write one line and flush
    pub fn line(&self, message: impl Display) {
        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(sink, "{message}").and_then(|()| sink.flush()) {
            warn!("Failed to write progress: {e}");
        }
    }

    /// Write `page: X/Y`
    pub fn page(&self, page: u32, total: u32) {
        self.line(format_args!("page: {page}/{total}"));
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

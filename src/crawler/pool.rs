//! Bounded-parallelism pool that drives crawl task trees
//!
//! The pool owns a multi-threaded, work-stealing tokio runtime with a fixed
//! number of workers. Every task a crawl fans out to becomes an independently
//! schedulable unit on that runtime.

use crate::crawler::task::{task_failure, CrawlTask};
use crate::{ConfigError, CrawlError};
use std::io;
use std::num::NonZeroUsize;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinSet;

/// Number of threads the host can run in parallel
pub fn max_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Fixed-size worker pool for crawl task trees
///
/// The worker count is `min(requested, max_parallelism())` and never changes
/// for the lifetime of the pool. Blocking work (file reads, DNS lookups) is
/// capped at the same number of threads.
///
/// [`CrawlPool::run`] blocks the calling thread and returns
/// [`CrawlError::Runtime`] when called from inside another async runtime. The
/// pool must also be dropped outside of any async runtime.
#[derive(Debug)]
pub struct CrawlPool {
    runtime: Runtime,
    parallelism: usize,
}

impl CrawlPool {
    /// Creates a pool with at most `requested` workers
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlPool)` - Pool with its workers started
    /// * `Err(CrawlError::Config)` - `requested` was zero
    /// * `Err(CrawlError::Runtime)` - The worker threads could not be started
    pub fn new(requested: usize) -> Result<Self, CrawlError> {
        if requested == 0 {
            return Err(ConfigError::Validation("parallelism must be >= 1, got 0".to_string()).into());
        }

        let parallelism = requested.min(max_parallelism());
        let runtime = Builder::new_multi_thread()
            .worker_threads(parallelism)
            .max_blocking_threads(parallelism)
            .thread_name("wordcrawl-worker")
            .enable_all()
            .build()
            .map_err(CrawlError::Runtime)?;

        tracing::debug!(
            "Crawl pool started with {} workers ({} requested)",
            parallelism,
            requested
        );

        Ok(Self {
            runtime,
            parallelism,
        })
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Runs every root task and its full subtree, blocking until all are done
    ///
    /// Roots run concurrently with each other. The first panicking or
    /// cancelled task fails the whole run.
    pub fn run(&self, roots: Vec<CrawlTask>) -> Result<(), CrawlError> {
        if Handle::try_current().is_ok() {
            return Err(CrawlError::Runtime(io::Error::new(
                io::ErrorKind::Other,
                "crawl cannot run from inside an async runtime",
            )));
        }

        self.runtime.block_on(async move {
            let mut running = JoinSet::new();
            for root in roots {
                running.spawn(root.run());
            }

            while let Some(joined) = running.join_next().await {
                joined.map_err(task_failure)??;
            }

            Ok(())
        })
    }
}

//! Crawl orchestration: the entry point of a crawl
//!
//! This module ties the crawl together:
//! - Computing the absolute deadline from the configured timeout
//! - Creating fresh shared state for each crawl
//! - Submitting one root task per starting address to the pool
//! - Ranking the final word counts into the crawl result

use crate::config::CrawlerConfig;
use crate::crawler::clock::{Clock, SystemClock};
use crate::crawler::pool::{max_parallelism, CrawlPool};
use crate::crawler::state::CrawlState;
use crate::crawler::task::{CrawlContext, CrawlTask};
use crate::parser::PageParser;
use crate::profiler::short_type_name;
use crate::ranking::{rank, WordCounts};
use crate::url::{normalize_url, PatternSet};
use crate::{ConfigError, CrawlError};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Most popular words, in rank order
    pub word_counts: WordCounts,

    /// Number of distinct addresses admitted
    pub urls_visited: usize,

    /// Number of admitted addresses whose page could not be fetched or parsed
    pub pages_failed: usize,
}

/// A crawler that turns starting addresses into a crawl result
pub trait WebCrawler: Send + Sync {
    /// Crawls from `starting_addresses` and returns the aggregated result
    ///
    /// Blocks the calling thread until the crawl is done. Must not be called
    /// from inside an async runtime.
    fn crawl(&self, starting_addresses: &[String]) -> Result<CrawlResult, CrawlError>;

    /// Upper bound on the worker count this crawler can use
    fn max_parallelism(&self) -> usize {
        max_parallelism()
    }

    /// Name used when reporting on this crawler
    fn name(&self) -> String {
        short_type_name::<Self>()
    }
}

/// Crawler that runs the task tree on a bounded worker pool
///
/// Owns its worker runtime: it must be used and dropped outside of any async
/// runtime. [`WebCrawler::crawl`] returns [`CrawlError::Runtime`] when called
/// from inside one.
#[derive(Debug)]
pub struct ParallelCrawler {
    clock: Arc<dyn Clock>,
    timeout: Duration,
    popular_word_count: usize,
    max_depth: u32,
    ignored_urls: Arc<PatternSet>,
    parser: Arc<dyn PageParser>,
    pool: CrawlPool,
}

impl ParallelCrawler {
    pub fn builder() -> ParallelCrawlerBuilder {
        ParallelCrawlerBuilder::default()
    }

    /// Creates a crawler from the `[crawler]` section of a configuration
    pub fn from_config(
        config: &CrawlerConfig,
        parser: Arc<dyn PageParser>,
    ) -> Result<Self, CrawlError> {
        Self::builder()
            .timeout(config.timeout())
            .max_depth(config.max_depth)
            .parallelism(config.parallelism)
            .popular_word_count(config.popular_word_count)
            .ignored_urls(PatternSet::compile(&config.ignored_urls)?)
            .build(parser)
    }

    /// Number of workers actually used
    pub fn parallelism(&self) -> usize {
        self.pool.parallelism()
    }
}

impl WebCrawler for ParallelCrawler {
    fn crawl(&self, starting_addresses: &[String]) -> Result<CrawlResult, CrawlError> {
        let deadline = self
            .clock
            .now()
            .checked_add(self.timeout)
            .ok_or_else(|| {
                ConfigError::Validation(format!("timeout {:?} is out of range", self.timeout))
            })?;

        let state = Arc::new(CrawlState::new());
        let context = Arc::new(CrawlContext {
            deadline,
            clock: Arc::clone(&self.clock),
            ignored_urls: Arc::clone(&self.ignored_urls),
            parser: Arc::clone(&self.parser),
            state: Arc::clone(&state),
        });

        let roots: Vec<CrawlTask> = starting_addresses
            .iter()
            .map(|address| CrawlTask::new(root_address(address), self.max_depth, Arc::clone(&context)))
            .collect();
        drop(context);

        tracing::info!(
            "Starting crawl of {} addresses (max depth {}, timeout {:?}, {} workers)",
            roots.len(),
            self.max_depth,
            self.timeout,
            self.pool.parallelism()
        );

        self.pool.run(roots)?;

        let urls_visited = state.visited_count();
        let pages_failed = state.pages_failed();
        let counts = state.snapshot_counts();

        let word_counts = if counts.is_empty() {
            WordCounts::new()
        } else {
            rank(&counts, self.popular_word_count)
        };

        tracing::info!(
            "Crawl finished: {} addresses visited, {} failed, {} distinct words",
            urls_visited,
            pages_failed,
            counts.len()
        );

        Ok(CrawlResult {
            word_counts,
            urls_visited,
            pages_failed,
        })
    }

    fn max_parallelism(&self) -> usize {
        self.pool.parallelism()
    }
}

/// Normalizes a starting address so it shares dedup keys with discovered links
///
/// Addresses that are not URLs are passed through for the parser to judge.
fn root_address(address: &str) -> String {
    normalize_url(address)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| address.to_string())
}

/// Builder for [`ParallelCrawler`]
#[derive(Debug)]
pub struct ParallelCrawlerBuilder {
    clock: Arc<dyn Clock>,
    timeout: Duration,
    popular_word_count: usize,
    max_depth: u32,
    parallelism: usize,
    ignored_urls: PatternSet,
}

impl Default for ParallelCrawlerBuilder {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            timeout: Duration::from_secs(5),
            popular_word_count: 10,
            max_depth: 10,
            parallelism: max_parallelism(),
            ignored_urls: PatternSet::default(),
        }
    }
}

impl ParallelCrawlerBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn popular_word_count(mut self, count: usize) -> Self {
        self.popular_word_count = count;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Requested worker count; clamped to the host's parallelism
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn ignored_urls(mut self, patterns: PatternSet) -> Self {
        self.ignored_urls = patterns;
        self
    }

    /// Starts the worker pool and returns the crawler
    pub fn build(self, parser: Arc<dyn PageParser>) -> Result<ParallelCrawler, CrawlError> {
        let pool = CrawlPool::new(self.parallelism)?;

        Ok(ParallelCrawler {
            clock: self.clock,
            timeout: self.timeout,
            popular_word_count: self.popular_word_count,
            max_depth: self.max_depth,
            ignored_urls: Arc::new(self.ignored_urls),
            parser,
            pool,
        })
    }
}

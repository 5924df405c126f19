//! Crawler module: the concurrent crawl engine
//!
//! This module contains the core crawling logic, including:
//! - Shared crawl state (visited addresses, word totals)
//! - The recursive crawl task and its gate checks
//! - The bounded worker pool that runs task trees
//! - Overall crawl orchestration

mod clock;
mod orchestrator;
mod pool;
mod state;
mod task;

pub use clock::{Clock, FakeClock, SystemClock};
pub use orchestrator::{CrawlResult, ParallelCrawler, ParallelCrawlerBuilder, WebCrawler};
pub use pool::{max_parallelism, CrawlPool};
pub use state::CrawlState;
pub use task::{CrawlContext, CrawlTask, Skip};

use crate::config::Config;
use crate::parser::PageParser;
use crate::CrawlError;
use std::sync::Arc;

/// Runs a complete crawl of the configured start pages
///
/// Convenience entry point that builds a [`ParallelCrawler`] from the
/// configuration and crawls `config.crawler.start_pages` once.
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed (individual page failures included)
/// * `Err(CrawlError)` - Setup failed or a crawl task panicked
pub fn crawl(config: &Config, parser: Arc<dyn PageParser>) -> Result<CrawlResult, CrawlError> {
    ParallelCrawler::from_config(&config.crawler, parser)?.crawl(&config.crawler.start_pages)
}

//! Crawl task: the recursive unit of crawl work
//!
//! A task decides whether its address should be processed, processes it
//! through the page parser, merges the page's words into the shared state and
//! then fans out one child task per discovered link, waiting for all of them.

use crate::crawler::clock::Clock;
use crate::crawler::state::CrawlState;
use crate::parser::PageParser;
use crate::url::PatternSet;
use crate::CrawlError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};

/// Everything a crawl task tree shares
///
/// Built once per crawl. Only `state` is written to; the rest is read-only for
/// the lifetime of the crawl.
#[derive(Debug)]
pub struct CrawlContext {
    /// Absolute deadline of the whole crawl
    pub deadline: Instant,
    pub clock: Arc<dyn Clock>,
    pub ignored_urls: Arc<PatternSet>,
    pub parser: Arc<dyn PageParser>,
    pub state: Arc<CrawlState>,
}

/// Why a task did no work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    DepthExhausted,
    DeadlinePassed,
    Ignored,
    AlreadyVisited,
}

/// One address to crawl, with the hops it may still follow
#[derive(Debug)]
pub struct CrawlTask {
    address: String,
    remaining_depth: u32,
    context: Arc<CrawlContext>,
}

impl CrawlTask {
    pub fn new(address: String, remaining_depth: u32, context: Arc<CrawlContext>) -> Self {
        Self {
            address,
            remaining_depth,
            context,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn remaining_depth(&self) -> u32 {
        self.remaining_depth
    }

    /// Runs the gate checks in order, admitting the address if all pass
    ///
    /// The depth, deadline and ignore checks are pure and come first so that
    /// a skipped address never takes its one admission slot.
    pub fn admit(&self) -> Result<(), Skip> {
        if self.remaining_depth == 0 {
            return Err(Skip::DepthExhausted);
        }

        if self.context.clock.now() >= self.context.deadline {
            return Err(Skip::DeadlinePassed);
        }

        if self.context.ignored_urls.matches(&self.address) {
            return Err(Skip::Ignored);
        }

        if !self.context.state.try_admit(&self.address) {
            return Err(Skip::AlreadyVisited);
        }

        Ok(())
    }

    /// Runs this task and its whole subtree
    ///
    /// Resolves once every descendant has finished. A page failure ends only
    /// this subtree; an error is returned only when a descendant task panicked
    /// or was cancelled.
    pub fn run(self) -> BoxFuture<'static, Result<(), CrawlError>> {
        Box::pin(async move {
            if let Err(skip) = self.admit() {
                tracing::debug!("Skipping {}: {:?}", self.address, skip);
                return Ok(());
            }

            let Some(links) = self.visit().await else {
                return Ok(());
            };

            let children: Vec<CrawlTask> = links.into_iter().map(|link| self.child(link)).collect();
            if children.is_empty() {
                return Ok(());
            }

            let mut running = JoinSet::new();
            for child in children {
                running.spawn(child.run());
            }

            while let Some(joined) = running.join_next().await {
                joined.map_err(task_failure)??;
            }

            Ok(())
        })
    }

    /// Fetches the page and merges its words, returning its links
    async fn visit(&self) -> Option<Vec<String>> {
        tracing::debug!("Visiting {} (depth {})", self.address, self.remaining_depth);

        match self.context.parser.parse(&self.address).await {
            Ok(page) => {
                self.context.state.merge_word_counts(&page.word_counts);
                Some(page.links)
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", self.address, e);
                self.context.state.record_failure();
                None
            }
        }
    }

    fn child(&self, address: String) -> CrawlTask {
        CrawlTask {
            address,
            remaining_depth: self.remaining_depth - 1,
            context: Arc::clone(&self.context),
        }
    }
}

pub(crate) fn task_failure(error: JoinError) -> CrawlError {
    let message = if error.is_panic() {
        format!("crawl task panicked: {}", error)
    } else {
        format!("crawl task cancelled: {}", error)
    };
    tracing::error!("{}", message);
    CrawlError::TaskFailed(message)
}

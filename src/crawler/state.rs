//! Shared crawl state
//!
//! The only data written by more than one crawl task: the set of admitted
//! addresses and the running word totals. One instance lives for exactly one
//! crawl.

use dashmap::{DashMap, DashSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Visited addresses and aggregated word counts of one crawl
///
/// Writes are safe from any number of tasks at once. The read accessors give
/// no isolation and are meant to be used once every task has finished.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: DashSet<String>,
    word_counts: DashMap<String, u64>,
    pages_failed: AtomicUsize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `address` as visited, returning true if it was not visited before
    ///
    /// Among any number of concurrent callers for the same address exactly
    /// one gets `true`.
    pub fn try_admit(&self, address: &str) -> bool {
        if self.visited.contains(address) {
            return false;
        }
        // insert is the atomic test-and-set; the check above only avoids the allocation
        self.visited.insert(address.to_string())
    }

    /// Adds one page's word counts to the running totals
    pub fn merge_word_counts(&self, page_counts: &HashMap<String, u64>) {
        for (word, count) in page_counts {
            // The entry guard holds the shard lock across the read-modify-write
            *self.word_counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    /// Records a page that could not be fetched or parsed
    pub fn record_failure(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pages_failed(&self) -> usize {
        self.pages_failed.load(Ordering::Relaxed)
    }

    pub fn is_visited(&self, address: &str) -> bool {
        self.visited.contains(address)
    }

    /// Copies the current word totals
    pub fn snapshot_counts(&self) -> HashMap<String, u64> {
        self.word_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

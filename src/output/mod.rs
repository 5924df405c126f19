//! Output module for crawl results
//!
//! This module handles:
//! - Writing the crawl result as JSON to a file or any writer
//! - Printing a human-readable crawl summary

mod writer;

pub use writer::{print_summary, CrawlResultWriter};

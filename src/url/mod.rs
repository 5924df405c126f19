//! URL handling module for Wordcrawl
//!
//! This module provides address normalization, used as the dedup key of a
//! crawl, and full-match pattern sets, used for ignored URLs and ignored words.

mod matcher;
mod normalize;

pub use matcher::PatternSet;
pub use normalize::normalize_url;

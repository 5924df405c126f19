//! Wordcrawl: a parallel word-count web crawler
//!
//! This crate crawls a set of starting pages, follows discovered links up to a
//! bounded depth and deadline, and aggregates the words found across every
//! visited page. Each page is visited at most once per crawl.

pub mod config;
pub mod crawler;
pub mod output;
pub mod parser;
pub mod profiler;
pub mod ranking;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Per-page fetch and parse failures never surface here: they are contained
/// within the failing page's subtree and only counted in the result.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build crawl pool: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Crawl task failed: {0}")]
    TaskFailed(String),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, ParallelCrawler, WebCrawler};
pub use parser::{HtmlPageParser, PageParser, ParseError, ParsedPage};
pub use ranking::{rank, WordCounts};
pub use url::{normalize_url, PatternSet};

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Wordcrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Addresses the crawl starts from, in order
    #[serde(rename = "start-pages")]
    pub start_pages: Vec<String>,

    /// Full-match regexes; a matching address is never visited
    #[serde(rename = "ignored-urls", default)]
    pub ignored_urls: Vec<String>,

    /// Full-match regexes; a matching word is never counted
    #[serde(rename = "ignored-words", default)]
    pub ignored_words: Vec<String>,

    /// Requested number of crawl workers, clamped to hardware parallelism
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Maximum number of hops followed from a start page
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Wall-clock budget of one crawl
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Number of most popular words kept in the result
    #[serde(rename = "popular-word-count", default = "default_popular_word_count")]
    pub popular_word_count: usize,
}

impl CrawlerConfig {
    /// The relative crawl deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Output configuration
///
/// Empty paths mean standard output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON crawl result
    #[serde(rename = "result-path", default)]
    pub result_path: String,

    /// Path the profiling report is appended to
    #[serde(rename = "profile-output-path", default)]
    pub profile_output_path: String,
}

fn default_parallelism() -> usize {
    crate::crawler::max_parallelism()
}

fn default_max_depth() -> u32 {
    10
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_popular_word_count() -> usize {
    10
}

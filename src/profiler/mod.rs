//! Profiler: timing of selected operations through explicit decorators
//!
//! Components are wrapped at composition time. A wrapped component behaves
//! like the one it wraps and records how long each profiled call took.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordcrawl::parser::HtmlPageParser;
//! use wordcrawl::profiler::Profiler;
//! use wordcrawl::url::PatternSet;
//!
//! let profiler = Profiler::new();
//! let parser = profiler.wrap_parser(HtmlPageParser::new(PatternSet::default()).unwrap());
//! // ... crawl with `Arc::new(parser)` ...
//! profiler.write_data(&mut std::io::stdout()).unwrap();
//! ```

mod state;

pub use state::ProfilingState;

use crate::crawler::{CrawlResult, WebCrawler};
use crate::parser::{PageParser, ParseError, ParsedPage};
use crate::CrawlError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Collects timings from every component it wrapped
#[derive(Debug, Clone)]
pub struct Profiler {
    start_time: DateTime<Utc>,
    state: Arc<ProfilingState>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::with_start_time(Utc::now())
    }

    pub fn with_start_time(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            state: Arc::new(ProfilingState::new()),
        }
    }

    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Wraps a page parser so that `parse` is timed
    pub fn wrap_parser<P: PageParser>(&self, parser: P) -> ProfiledParser<P> {
        ProfiledParser {
            inner: parser,
            state: Arc::clone(&self.state),
        }
    }

    /// Wraps a crawler so that `crawl` is timed
    pub fn wrap_crawler<C: WebCrawler>(&self, crawler: C) -> ProfiledCrawler<C> {
        ProfiledCrawler {
            inner: crawler,
            state: Arc::clone(&self.state),
        }
    }

    /// Writes the profiling report
    pub fn write_data<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Run at {}", self.start_time.to_rfc2822())?;
        self.state.write(writer)?;
        writeln!(writer)
    }

    /// Appends the profiling report to the file at `path`, creating it if needed
    pub fn write_data_to_path(&self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        self.write_data(&mut writer)?;
        writer.flush()
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

/// A page parser whose `parse` calls are timed
#[derive(Debug)]
pub struct ProfiledParser<P> {
    inner: P,
    state: Arc<ProfilingState>,
}

#[async_trait]
impl<P: PageParser> PageParser for ProfiledParser<P> {
    async fn parse(&self, address: &str) -> Result<ParsedPage, ParseError> {
        let start = Instant::now();
        let result = self.inner.parse(address).await;
        self.state
            .record(&self.inner.name(), "parse", start.elapsed());
        result
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

/// A crawler whose `crawl` calls are timed
#[derive(Debug)]
pub struct ProfiledCrawler<C> {
    inner: C,
    state: Arc<ProfilingState>,
}

impl<C: WebCrawler> WebCrawler for ProfiledCrawler<C> {
    fn crawl(&self, starting_addresses: &[String]) -> Result<CrawlResult, CrawlError> {
        let start = Instant::now();
        let result = self.inner.crawl(starting_addresses);
        self.state
            .record(&self.inner.name(), "crawl", start.elapsed());
        result
    }

    // Not profiled
    fn max_parallelism(&self) -> usize {
        self.inner.max_parallelism()
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

/// Type name without module paths, e.g. `Wrapper<Inner>`
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            short.push_str(segment.rsplit("::").next().unwrap_or(""));
            segment.clear();
            short.push(ch);
        }
    }
    short.push_str(segment.rsplit("::").next().unwrap_or(""));

    short
}

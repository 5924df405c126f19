//! Wordcrawl main entry point
//!
//! This is the command-line interface for the Wordcrawl word-count crawler.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wordcrawl::config::{load_config_with_hash, Config};
use wordcrawl::crawler::{ParallelCrawler, WebCrawler};
use wordcrawl::output::{print_summary, CrawlResultWriter};
use wordcrawl::parser::{HtmlPageParser, PageParser};
use wordcrawl::profiler::Profiler;
use wordcrawl::url::PatternSet;
use wordcrawl::CrawlResult;
use tracing_subscriber::EnvFilter;

/// Wordcrawl: a parallel word-count web crawler
///
/// Wordcrawl crawls the configured start pages, follows links up to a depth
/// limit and a deadline, and reports the most popular words it found.
#[derive(Parser, Debug)]
#[command(name = "wordcrawl")]
#[command(version)]
#[command(about = "A parallel word-count web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Print a human-readable summary after the crawl
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let result = handle_crawl(&config)?;

    if cli.summary {
        print_summary(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so a result written to stdout stays valid JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wordcrawl=info,warn"),
            1 => EnvFilter::new("wordcrawl=debug,info"),
            2 => EnvFilter::new("wordcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Wordcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Parallelism: {}", config.crawler.parallelism);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!("  Popular word count: {}", config.crawler.popular_word_count);

    println!("\nStart Pages ({}):", config.crawler.start_pages.len());
    for page in &config.crawler.start_pages {
        println!("  - {}", page);
    }

    println!("\nIgnored URLs ({}):", config.crawler.ignored_urls.len());
    for pattern in &config.crawler.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Words ({}):", config.crawler.ignored_words.len());
    for pattern in &config.crawler.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!("  Result: {}", display_path(&config.output.result_path));
    println!("  Profile: {}", display_path(&config.output.profile_output_path));

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
fn handle_crawl(config: &Config) -> anyhow::Result<CrawlResult> {
    let profiler = Profiler::new();

    let ignored_words = PatternSet::compile(&config.crawler.ignored_words)?;
    let parser = HtmlPageParser::new(ignored_words).context("Failed to build HTTP client")?;
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap_parser(parser));

    let crawler = profiler.wrap_crawler(ParallelCrawler::from_config(&config.crawler, parser)?);
    tracing::info!(
        "Crawling {} start pages with {} workers",
        config.crawler.start_pages.len(),
        crawler.max_parallelism()
    );

    let result = match crawler.crawl(&config.crawler.start_pages) {
        Ok(result) => {
            tracing::info!("Crawl completed successfully");
            result
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_result(&result, &config.output.result_path)?;
    write_profile(&profiler, &config.output.profile_output_path)?;

    Ok(result)
}

fn write_result(result: &CrawlResult, path: &str) -> anyhow::Result<()> {
    let writer = CrawlResultWriter::new(result);
    if path.is_empty() {
        writer.write(io::stdout().lock())?;
    } else {
        writer
            .write_to_path(Path::new(path))
            .with_context(|| format!("Failed to write result to {}", path))?;
        tracing::info!("Result written to: {}", path);
    }
    Ok(())
}

fn write_profile(profiler: &Profiler, path: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        let mut stdout = BufWriter::new(io::stdout().lock());
        profiler.write_data(&mut stdout)?;
        stdout.flush()?;
    } else {
        profiler
            .write_data_to_path(Path::new(path))
            .with_context(|| format!("Failed to write profile to {}", path))?;
        tracing::info!("Profile appended to: {}", path);
    }
    Ok(())
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<stdout>"
    } else {
        path
    }
}

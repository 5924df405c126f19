//! Integration tests for the crawl engine
//!
//! These tests crawl an in-memory link graph through the public API, so every
//! outcome is deterministic and no network is involved.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wordcrawl::crawler::{crawl, Clock, FakeClock, ParallelCrawler, WebCrawler};
use wordcrawl::config::{Config, CrawlerConfig, OutputConfig};
use wordcrawl::{CrawlError, PageParser, ParseError, ParsedPage};

/// One page of the in-memory graph
#[derive(Debug, Clone, Default)]
struct Page {
    words: Vec<(&'static str, u64)>,
    links: Vec<String>,
}

/// Parser over a fixed link graph that records every address it was asked for
#[derive(Debug, Default)]
struct GraphParser {
    pages: HashMap<String, Page>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    calls: Mutex<HashMap<String, usize>>,
    /// Advanced by `tick` on every parse call
    clock: Option<(Arc<FakeClock>, Duration)>,
}

impl GraphParser {
    fn new() -> Self {
        Self::default()
    }

    fn page(mut self, address: &str, words: &[(&'static str, u64)], links: &[&str]) -> Self {
        self.pages.insert(
            address.to_string(),
            Page {
                words: words.to_vec(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    fn failing(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    fn panicking(mut self, address: &str) -> Self {
        self.panicking.insert(address.to_string());
        self
    }

    fn ticking(mut self, clock: Arc<FakeClock>, tick: Duration) -> Self {
        self.clock = Some((clock, tick));
        self
    }

    fn calls(&self, address: &str) -> usize {
        self.calls.lock().unwrap().get(address).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageParser for GraphParser {
    async fn parse(&self, address: &str) -> Result<ParsedPage, ParseError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_insert(0) += 1;

        if let Some((clock, tick)) = &self.clock {
            clock.advance(*tick);
        }

        if self.panicking.contains(address) {
            panic!("parser blew up on {}", address);
        }

        if self.failing.contains(address) {
            return Err(ParseError::Other {
                address: address.to_string(),
                message: "simulated failure".to_string(),
            });
        }

        let page = self.pages.get(address).cloned().unwrap_or_default();
        Ok(ParsedPage {
            word_counts: page
                .words
                .iter()
                .map(|(word, count)| (word.to_string(), *count))
                .collect(),
            links: page.links,
        })
    }
}

/// a -> {b, c}, b -> {a}; a = {y:1}, b = {x:2}, c = {x:1, y:3}
fn cyclic_graph() -> GraphParser {
    GraphParser::new()
        .page("a", &[("y", 1)], &["b", "c"])
        .page("b", &[("x", 2)], &["a"])
        .page("c", &[("x", 1), ("y", 3)], &[])
}

fn crawler(parser: Arc<GraphParser>, max_depth: u32) -> ParallelCrawler {
    ParallelCrawler::builder()
        .max_depth(max_depth)
        .timeout(Duration::from_secs(60))
        .parallelism(4)
        .build(parser)
        .unwrap()
}

fn addresses(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| a.to_string()).collect()
}

#[test]
fn test_cycle_does_not_double_count() {
    let parser = Arc::new(cyclic_graph());
    let result = crawler(Arc::clone(&parser), 3)
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.pages_failed, 0);
    assert_eq!(
        result.word_counts.to_map(),
        HashMap::from([("x".to_string(), 3), ("y".to_string(), 4)])
    );
    assert_eq!(result.word_counts.words(), vec!["y", "x"]);
    assert_eq!(parser.calls("a"), 1);
    assert_eq!(parser.calls("b"), 1);
    assert_eq!(parser.calls("c"), 1);
}

#[test]
fn test_ignored_address_is_never_visited() {
    let parser = Arc::new(cyclic_graph());
    let result = ParallelCrawler::builder()
        .max_depth(3)
        .timeout(Duration::from_secs(60))
        .parallelism(4)
        .ignored_urls(wordcrawl::PatternSet::compile(&["b".to_string()]).unwrap())
        .build(Arc::clone(&parser) as Arc<dyn PageParser>)
        .unwrap()
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(
        result.word_counts.to_map(),
        HashMap::from([("x".to_string(), 1), ("y".to_string(), 4)])
    );
    assert_eq!(parser.calls("b"), 0);
}

#[test]
fn test_parse_failure_is_contained_to_its_subtree() {
    let parser = Arc::new(
        cyclic_graph()
            .page("b", &[("x", 2)], &["d"])
            .page("d", &[("z", 7)], &[])
            .failing("b"),
    );
    let result = crawler(Arc::clone(&parser), 3)
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.pages_failed, 1);
    assert_eq!(
        result.word_counts.to_map(),
        HashMap::from([("x".to_string(), 1), ("y".to_string(), 4)])
    );
    // b's links are never discovered
    assert_eq!(parser.calls("d"), 0);
}

#[test]
fn test_zero_depth_visits_nothing() {
    let parser = Arc::new(cyclic_graph());
    let result = crawler(Arc::clone(&parser), 0)
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
    assert_eq!(parser.total_calls(), 0);
}

#[test]
fn test_depth_limits_hops() {
    let parser = Arc::new(
        GraphParser::new()
            .page("a", &[("one", 1)], &["b"])
            .page("b", &[("two", 1)], &["c"])
            .page("c", &[("three", 1)], &[]),
    );
    let result = crawler(Arc::clone(&parser), 2)
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(result.word_counts.get("three"), None);
    assert_eq!(parser.calls("c"), 0);
}

#[test]
fn test_zero_timeout_attempts_no_fetch() {
    let parser = Arc::new(cyclic_graph());
    let result = ParallelCrawler::builder()
        .max_depth(3)
        .timeout(Duration::ZERO)
        .parallelism(2)
        .build(Arc::clone(&parser) as Arc<dyn PageParser>)
        .unwrap()
        .crawl(&addresses(&["a", "b", "c"]))
        .unwrap();

    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
    assert_eq!(parser.total_calls(), 0);
}

#[test]
fn test_deadline_stops_new_work_mid_crawl() {
    let clock = Arc::new(FakeClock::new());
    // Every parse moves time past the deadline, so only the root is visited
    let parser = Arc::new(cyclic_graph().ticking(Arc::clone(&clock), Duration::from_secs(10)));
    let result = ParallelCrawler::builder()
        .clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .max_depth(3)
        .timeout(Duration::from_secs(5))
        .parallelism(2)
        .build(Arc::clone(&parser) as Arc<dyn PageParser>)
        .unwrap()
        .crawl(&addresses(&["a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 1);
    assert_eq!(result.word_counts.to_map(), HashMap::from([("y".to_string(), 1)]));
    assert_eq!(parser.total_calls(), 1);
}

#[test]
fn test_multiple_roots_share_dedup() {
    let parser = Arc::new(cyclic_graph());
    let result = crawler(Arc::clone(&parser), 3)
        .crawl(&addresses(&["a", "c", "a"]))
        .unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.word_counts.get("x"), Some(3));
    assert_eq!(result.word_counts.get("y"), Some(4));
    assert_eq!(parser.calls("a"), 1);
    assert_eq!(parser.calls("c"), 1);
}

#[test]
fn test_crawler_is_reusable() {
    let parser = Arc::new(cyclic_graph());
    let crawler = crawler(Arc::clone(&parser), 3);

    let first = crawler.crawl(&addresses(&["a"])).unwrap();
    let second = crawler.crawl(&addresses(&["a"])).unwrap();

    assert_eq!(first, second);
    assert_eq!(parser.calls("a"), 2);
}

#[test]
fn test_dense_graph_admits_each_address_once() {
    const PAGES: usize = 60;

    let names: Vec<String> = (0..PAGES).map(|i| format!("page{}", i)).collect();
    let links: Vec<&str> = names.iter().map(String::as_str).collect();

    // Every page links to every page, so each address is discovered many
    // times concurrently
    let mut parser = GraphParser::new();
    for (i, name) in names.iter().enumerate() {
        let word: &'static str = if i % 2 == 0 { "even" } else { "odd" };
        parser = parser.page(name, &[(word, i as u64 + 1), ("all", 1)], &links);
    }
    let parser = Arc::new(parser);

    let result = ParallelCrawler::builder()
        .max_depth(3)
        .timeout(Duration::from_secs(60))
        .parallelism(64)
        .build(Arc::clone(&parser) as Arc<dyn PageParser>)
        .unwrap()
        .crawl(&addresses(&["page0"]))
        .unwrap();

    assert_eq!(result.urls_visited, PAGES);
    for name in &names {
        assert_eq!(parser.calls(name), 1, "{} parsed more than once", name);
    }

    // Totals match a sequential merge of the same pages
    let mut expected: HashMap<String, u64> = HashMap::new();
    for name in &names {
        for (word, count) in &parser.pages[name].words {
            *expected.entry(word.to_string()).or_insert(0) += count;
        }
    }
    assert_eq!(result.word_counts.to_map(), expected);
}

#[test]
fn test_panicking_parser_fails_the_crawl() {
    let parser = Arc::new(cyclic_graph().panicking("c"));
    let result = crawler(parser, 3).crawl(&addresses(&["a"]));

    assert!(matches!(result, Err(CrawlError::TaskFailed(_))));
}

#[test]
fn test_crawl_from_config() {
    let config = Config {
        crawler: CrawlerConfig {
            start_pages: addresses(&["a"]),
            ignored_urls: vec![],
            ignored_words: vec![],
            parallelism: 2,
            max_depth: 3,
            timeout_seconds: 30,
            popular_word_count: 1,
        },
        output: OutputConfig::default(),
    };

    let result = crawl(&config, Arc::new(cyclic_graph())).unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(result.word_counts.len(), 1);
    assert_eq!(result.word_counts.get("y"), Some(4));
}

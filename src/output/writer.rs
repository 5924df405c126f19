use crate::crawler::CrawlResult;
use crate::ranking::WordCounts;
use crate::CrawlError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON shape of a written crawl result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedResult<'a> {
    word_counts: &'a WordCounts,
    urls_visited: usize,
}

/// Writes a crawl result as JSON
///
/// Output format:
///
/// ```json
/// {
///   "wordCounts": { "most": 9, "popular": 4 },
///   "urlsVisited": 12
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CrawlResultWriter<'a> {
    result: &'a CrawlResult,
}

impl<'a> CrawlResultWriter<'a> {
    pub fn new(result: &'a CrawlResult) -> Self {
        Self { result }
    }

    /// Writes the result to `writer`, followed by a newline
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), CrawlError> {
        let serialized = SerializedResult {
            word_counts: &self.result.word_counts,
            urls_visited: self.result.urls_visited,
        };

        serde_json::to_writer_pretty(&mut writer, &serialized)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the result to the file at `path`, replacing any previous content
    pub fn write_to_path(&self, path: &Path) -> Result<(), CrawlError> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))
    }
}

/// Prints a short summary of a crawl result to stdout
pub fn print_summary(result: &CrawlResult) {
    println!("=== Crawl Summary ===\n");
    println!("  URLs visited: {}", result.urls_visited);
    println!("  Pages failed: {}", result.pages_failed);

    if result.word_counts.is_empty() {
        println!("  No words found");
        return;
    }

    println!("\nPopular words:");
    for (word, count) in result.word_counts.iter() {
        println!("  {}: {}", word, count);
    }
}

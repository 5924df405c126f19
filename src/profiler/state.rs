//! Accumulated timing statistics
//!
//! This module keeps the total time spent in each profiled method and
//! formats it for the profiling report.

use dashmap::DashMap;
use std::io::{self, Write};
use std::time::Duration;

/// Total elapsed time per `Component#method`
#[derive(Debug, Default)]
pub struct ProfilingState {
    totals: DashMap<String, Duration>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the total of `component#method`
    pub fn record(&self, component: &str, method: &str, elapsed: Duration) {
        *self
            .totals
            .entry(format!("{}#{}", component, method))
            .or_insert(Duration::ZERO) += elapsed;
    }

    /// Total time recorded for `component#method`, if any
    pub fn total(&self, component: &str, method: &str) -> Option<Duration> {
        self.totals
            .get(&format!("{}#{}", component, method))
            .map(|entry| *entry.value())
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Writes one line per method, sorted by method key
    ///
    /// Format: `Component#method took 0m 1s 250ms`
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut entries: Vec<(String, Duration)> = self
            .totals
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, elapsed) in entries {
            writeln!(writer, "{} took {}", key, format_duration(elapsed))?;
        }

        Ok(())
    }
}

/// Formats a duration as minutes, seconds and milliseconds
fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        seconds / 60,
        seconds % 60,
        duration.subsec_millis()
    )
}

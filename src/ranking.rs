//! Ranking of aggregated word counts
//!
//! Reduces the full word-count map of a crawl to its most popular words.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

/// An ordered word -> count view
///
/// Entries keep the order they were ranked in; serialized as a JSON object in
/// that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    entries: Vec<(String, u64)>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `word`, if present
    pub fn get(&self, word: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == word)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    /// Words in rank order
    pub fn words(&self) -> Vec<&str> {
        self.entries.iter().map(|(word, _)| word.as_str()).collect()
    }

    pub fn to_map(&self) -> HashMap<String, u64> {
        self.entries.iter().cloned().collect()
    }
}

impl From<Vec<(String, u64)>> for WordCounts {
    fn from(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }
}

impl Serialize for WordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, count) in &self.entries {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Returns at most `limit` of the most popular words
///
/// # Ordering
///
/// 1. Count, descending
/// 2. Word length, descending
/// 3. Word, alphabetically
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use wordcrawl::ranking::rank;
///
/// let counts = HashMap::from([
///     ("cat".to_string(), 2),
///     ("horse".to_string(), 2),
///     ("ox".to_string(), 5),
/// ]);
/// let top = rank(&counts, 2);
/// assert_eq!(top.words(), vec!["ox", "horse"]);
/// ```
pub fn rank(counts: &HashMap<String, u64>, limit: usize) -> WordCounts {
    let mut entries: Vec<(String, u64)> = counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();

    entries.sort_by(compare_entries);
    entries.truncate(limit);

    WordCounts::from(entries)
}

fn compare_entries(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.len().cmp(&a.0.len()))
        .then_with(|| a.0.cmp(&b.0))
}

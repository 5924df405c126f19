use crate::ConfigError;
use regex::Regex;

/// A compiled list of patterns with full-string match semantics
///
/// A candidate matches the set when any one pattern matches the whole
/// candidate, not just a substring of it. An empty set matches nothing.
///
/// # Examples
///
/// ```
/// use wordcrawl::url::PatternSet;
///
/// let patterns = PatternSet::compile(&["https://example\\.com/private/.*".to_string()]).unwrap();
/// assert!(patterns.matches("https://example.com/private/a"));
/// assert!(!patterns.matches("https://example.com/public/https://example.com/private/a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles every pattern, failing on the first invalid one
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let invalid = |e: regex::Error| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                };
                // Must be valid on its own, or it could close the anchoring group
                Regex::new(pattern).map_err(invalid)?;
                Regex::new(&format!("^(?:{})$", pattern)).map_err(invalid)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the entire candidate
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(candidate))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

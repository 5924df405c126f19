//! Page parser: turns one address into its word counts and outbound links
//!
//! The crawl engine only sees the [`PageParser`] trait. This module also
//! provides the production implementation, [`HtmlPageParser`], which fetches
//! pages over HTTP(S) or from local files and extracts words and links from
//! the HTML.

mod extract;
mod html;

pub use extract::parse_html;
pub use html::{build_http_client, HtmlPageParser};

use crate::profiler::short_type_name;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Words and links found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Occurrences of each word on the page
    pub word_counts: HashMap<String, u64>,

    /// Outbound links, normalized, in order of appearance
    pub links: Vec<String>,
}

/// Failure to fetch or parse a single page
///
/// These errors stay local to the page they occurred on: the crawl logs and
/// counts them and carries on with the rest of the tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid address {address}: {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Unsupported address scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP error for {address}: {source}")]
    Http {
        address: String,
        source: reqwest::Error,
    },

    #[error("HTTP status {status} for {address}")]
    Status { address: String, status: u16 },

    #[error("Expected HTML from {address}, got {content_type}")]
    ContentMismatch {
        address: String,
        content_type: String,
    },

    #[error("Failed to read {address}: {source}")]
    File {
        address: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {address}: {message}")]
    Other { address: String, message: String },
}

/// Source of page contents for the crawl engine
///
/// Implementations must be safe to call from many crawl workers at once.
#[async_trait]
pub trait PageParser: Send + Sync {
    /// Fetches `address` and returns its word counts and outbound links
    async fn parse(&self, address: &str) -> Result<ParsedPage, ParseError>;

    /// Name used when reporting on this parser
    fn name(&self) -> String {
        short_type_name::<Self>()
    }
}

impl fmt::Debug for dyn PageParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[async_trait]
impl<P: PageParser + ?Sized> PageParser for Arc<P> {
    async fn parse(&self, address: &str) -> Result<ParsedPage, ParseError> {
        (**self).parse(address).await
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

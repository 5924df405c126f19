//! HTML page parser over HTTP and local files
//!
//! This module fetches a page for the crawl engine:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests for `http` and `https` addresses
//! - Local reads for `file` addresses
//! - Error classification into [`ParseError`]

use crate::parser::extract::parse_html;
use crate::parser::{PageParser, ParseError, ParsedPage};
use crate::url::PatternSet;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// User agent sent with every request
const USER_AGENT: &str = concat!("wordcrawl/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use wordcrawl::parser::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page parser that fetches HTML and extracts words and links from it
///
/// Each call is one bounded fetch: there are no retries.
#[derive(Debug, Clone)]
pub struct HtmlPageParser {
    client: Client,
    ignored_words: PatternSet,
}

impl HtmlPageParser {
    /// Creates a parser with a default HTTP client
    pub fn new(ignored_words: PatternSet) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, ignored_words))
    }

    /// Creates a parser that uses the given HTTP client
    pub fn with_client(client: Client, ignored_words: PatternSet) -> Self {
        Self {
            client,
            ignored_words,
        }
    }

    async fn fetch(&self, url: &Url) -> Result<String, ParseError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => fetch_file(url).await,
            _ => Err(ParseError::UnsupportedScheme(url.to_string())),
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<String, ParseError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ParseError::Http {
                address: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParseError::Status {
                address: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is treated as HTML
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !content_type.contains("html") {
            return Err(ParseError::ContentMismatch {
                address: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|source| ParseError::Http {
            address: url.to_string(),
            source,
        })
    }
}

async fn fetch_file(url: &Url) -> Result<String, ParseError> {
    let path = url
        .to_file_path()
        .map_err(|_| ParseError::UnsupportedScheme(url.to_string()))?;

    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ParseError::File {
            address: url.to_string(),
            source,
        })
}

#[async_trait]
impl PageParser for HtmlPageParser {
    async fn parse(&self, address: &str) -> Result<ParsedPage, ParseError> {
        let url = Url::parse(address).map_err(|e| ParseError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        let body = self.fetch(&url).await?;
        Ok(parse_html(&body, &url, &self.ignored_words))
    }
}

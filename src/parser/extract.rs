//! HTML extraction of words and links
//!
//! This module turns an HTML document into a [`ParsedPage`]:
//! - Words from the visible text of `<body>`, counted
//! - Links to follow (from `<a>` tags), resolved and normalized

use crate::parser::ParsedPage;
use crate::url::{normalize_url, PatternSet};
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Elements whose text is never shown to a reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses HTML content and extracts word counts and links
///
/// # Word Extraction Rules
///
/// - Only text under `<body>` is considered; `<script>` and `<style>` are skipped
/// - Text is split on whitespace
/// - Non-alphabetic characters are stripped and the rest lowercased
/// - Empty words and words fully matching an `ignored_words` pattern are dropped
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` tags, resolved against `base_url`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
///
/// Links keep their order of appearance and are normalized with
/// [`normalize_url`].
///
/// # Example
///
/// ```
/// use wordcrawl::parser::parse_html;
/// use wordcrawl::url::PatternSet;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hello hello!</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, &PatternSet::default());
/// assert_eq!(parsed.word_counts.get("hello"), Some(&2));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, ignored_words: &PatternSet) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        word_counts: count_words(&document, ignored_words),
        links: extract_links(&document, base_url),
    }
}

fn count_words(document: &Html, ignored_words: &PatternSet) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let Some(body) = body else {
        return counts;
    };

    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| {
                parent
                    .value()
                    .as_element()
                    .map(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            })
            .unwrap_or(false);
        if hidden {
            continue;
        }

        for raw in text.split_whitespace() {
            let word = clean_word(raw);
            if word.is_empty() || ignored_words.matches(&word) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    counts
}

/// Strips non-alphabetic characters and lowercases the rest
fn clean_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(address) = resolve_link(href, base_url) {
                    links.push(address);
                }
            }
        }
    }

    links
}

/// Resolves a link href to a normalized absolute address
///
/// Returns None if the link should not be followed.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str())
        .ok()
        .map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn parse(html: &str) -> ParsedPage {
        parse_html(html, &base_url(), &PatternSet::default())
    }

    #[test]
    fn test_count_body_words() {
        let parsed = parse(
            r#"<html><head><title>Ignored Title</title></head>
            <body><p>The quick fox.</p><p>THE lazy dog, the end</p></body></html>"#,
        );
        assert_eq!(parsed.word_counts.get("the"), Some(&3));
        assert_eq!(parsed.word_counts.get("fox"), Some(&1));
        assert_eq!(parsed.word_counts.get("dog"), Some(&1));
        assert_eq!(parsed.word_counts.get("ignored"), None);
        assert_eq!(parsed.word_counts.get("title"), None);
    }

    #[test]
    fn test_strip_punctuation_and_digits() {
        let parsed = parse(r#"<html><body>don't 42 rust2021 -- ...</body></html>"#);
        assert_eq!(parsed.word_counts.get("dont"), Some(&1));
        assert_eq!(parsed.word_counts.get("rust"), Some(&1));
        assert_eq!(parsed.word_counts.len(), 2);
    }

    #[test]
    fn test_skip_script_and_style() {
        let parsed = parse(
            r#"<html><body>visible<script>var hidden = 1;</script><style>p { color: red }</style></body></html>"#,
        );
        assert_eq!(parsed.word_counts.len(), 1);
        assert_eq!(parsed.word_counts.get("visible"), Some(&1));
    }

    #[test]
    fn test_ignored_words() {
        let ignored = PatternSet::compile(&["^.{1,3}$".to_string(), "lorem".to_string()]).unwrap();
        let parsed = parse_html(
            r#"<html><body>a an the lorem ipsum lorems</body></html>"#,
            &base_url(),
            &ignored,
        );
        assert_eq!(parsed.word_counts.len(), 2);
        assert_eq!(parsed.word_counts.get("ipsum"), Some(&1));
        assert_eq!(parsed.word_counts.get("lorems"), Some(&1));
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse("");
        assert!(parsed.word_counts.is_empty());
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_extract_absolute_link() {
        let parsed = parse(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(parsed.links, vec!["https://other.com/page".to_string()]);
    }

    #[test]
    fn test_extract_relative_link() {
        let parsed = parse(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(parsed.links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn test_link_is_normalized() {
        let parsed =
            parse(r#"<html><body><a href="/other?utm_source=x&b=2&a=1#frag">Link</a></body></html>"#);
        assert_eq!(
            parsed.links,
            vec!["https://example.com/other?a=1&b=2".to_string()]
        );
    }

    #[test]
    fn test_skip_special_links() {
        let html = r##"
            <html><body>
                <a href="javascript:void(0)">js</a>
                <a href="mailto:test@example.com">mail</a>
                <a href="tel:+1234567890">tel</a>
                <a href="data:text/html,<h1>x</h1>">data</a>
                <a href="#section">jump</a>
                <a href="/file.pdf" download>download</a>
                <a href="">empty</a>
            </body></html>
        "##;
        assert!(parse(html).links.is_empty());
    }

    #[test]
    fn test_links_keep_document_order() {
        let html = r#"
            <html><body>
                <a href="/c">C</a>
                <a href="/a">A</a>
                <a href="https://other.com/b">B</a>
            </body></html>
        "#;
        assert_eq!(
            parse(html).links,
            vec![
                "https://example.com/c".to_string(),
                "https://example.com/a".to_string(),
                "https://other.com/b".to_string(),
            ]
        );
    }
}

use crate::config::types::{Config, CrawlerConfig};
use crate::url::PatternSet;
use crate::ConfigError;
use url::Url;

/// Schemes a start page may use
const START_PAGE_SCHEMES: &[&str] = &["http", "https", "file"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth and timeout_seconds may be zero; the crawl then visits nothing

    if config.parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            config.parallelism
        )));
    }

    validate_start_pages(&config.start_pages)?;

    PatternSet::compile(&config.ignored_urls)?;
    PatternSet::compile(&config.ignored_words)?;

    Ok(())
}

/// Validates start page addresses
fn validate_start_pages(pages: &[String]) -> Result<(), ConfigError> {
    if pages.is_empty() {
        return Err(ConfigError::Validation(
            "start_pages must contain at least one address".to_string(),
        ));
    }

    for page in pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start page '{}': {}", page, e)))?;

        if !START_PAGE_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::Validation(format!(
                "Start page '{}' must use http, https or file scheme",
                page
            )));
        }
    }

    Ok(())
}

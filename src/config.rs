use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::ConfigError;

pub const MAX_PAGES_LIMIT: usize = 100;
pub const MAX_DEPTH_LIMIT: u32 = 10;
pub const MAX_REQUESTS_PER_SECOND: u32 = 60;

/// Parameters for one crawl run. Immutable once the run starts; validation
/// happens up front via [`CrawlConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub base_url: String,
    pub max_depth: u32,
    pub max_pages: usize,
    /// Lowercased keyword list; empty means every fetched page is accepted.
    pub keywords: Vec<String>,
    pub requests_per_second: u32,
    pub timeout: Duration,
    /// Concurrency fan-out of one scheduler batch.
    pub batch_size: usize,
    pub user_agent: String,
    pub max_redirects: u32,
    pub max_content_size: usize,
    pub allowed_content_types: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: 3,
            max_pages: 10,
            keywords: Vec::new(),
            requests_per_second: 5,
            timeout: Duration::from_secs(10),
            batch_size: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            max_redirects: 5,
            max_content_size: 10 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "text/plain".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

impl CrawlConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Parses a comma-separated keyword list, trimming whitespace and
    /// dropping empty entries. Matching is case-insensitive so the terms are
    /// lowercased here, once.
    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.keywords = keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn with_requests_per_second(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks every parameter against its allowed range and parses the base
    /// URL. Returns the parsed URL so callers hold a structurally valid seed.
    pub fn validate(&self) -> std::result::Result<Url, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }

        Self::check_range("max_pages", self.max_pages as u64, 1, MAX_PAGES_LIMIT as u64)?;
        Self::check_range(
            "max_depth",
            u64::from(self.max_depth),
            1,
            u64::from(MAX_DEPTH_LIMIT),
        )?;
        Self::check_range(
            "requests_per_second",
            u64::from(self.requests_per_second),
            1,
            u64::from(MAX_REQUESTS_PER_SECOND),
        )?;
        Self::check_range("batch_size", self.batch_size as u64, 1, 100)?;

        Ok(url)
    }

    fn check_range(
        param: &'static str,
        value: u64,
        min: u64,
        max: u64,
    ) -> std::result::Result<(), ConfigError> {
        if value < min || value > max {
            return Err(ConfigError::OutOfRange {
                param,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = CrawlConfig::new("https://example.com");
        let url = config.validate().unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn empty_base_url_rejected() {
        let config = CrawlConfig::new("  ");
        assert!(matches!(config.validate(), Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn scheme_must_be_http_or_https() {
        let config = CrawlConfig::new("ftp://example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme(_))
        ));

        // A bare hostname has no explicit scheme and fails to parse at all.
        let config = CrawlConfig::new("example.com/page");
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_parameters_rejected() {
        let config = CrawlConfig::new("https://example.com").with_max_pages(101);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                param: "max_pages",
                ..
            })
        ));

        let config = CrawlConfig::new("https://example.com").with_max_depth(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                param: "max_depth",
                ..
            })
        ));

        let config = CrawlConfig::new("https://example.com").with_requests_per_second(61);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                param: "requests_per_second",
                ..
            })
        ));
    }

    #[test]
    fn keywords_are_trimmed_and_lowercased() {
        let config = CrawlConfig::new("https://example.com")
            .with_keywords(" Robotics, AI ,, machine learning ");
        assert_eq!(config.keywords, vec!["robotics", "ai", "machine learning"]);
    }
}

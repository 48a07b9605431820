use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::{CrawlConfig, HttpClient, PageParser, RateLimiter, Result};

/// One accepted page. Immutable once produced; owned by the collector after
/// acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: Url,
    pub title: String,
    pub content: String,
    pub depth: u32,
    pub links: Vec<Url>,
}

/// What one dispatched fetch resolved to.
///
/// A keyword-rejected page is fetched (the cost is incurred) and excluded
/// from the results, but its same-origin links still feed the frontier so
/// traversal continues through it.
#[derive(Debug)]
pub enum FetchOutcome {
    Page(PageRecord),
    Skipped { depth: u32, links: Vec<Url> },
    Failed,
}

/// Performs one rate-gated HTTP GET, parses the body, applies the keyword
/// gate and filters discovered links to the configured origin.
pub struct PageFetcher {
    client: HttpClient,
    rate_limiter: Arc<RateLimiter>,
    config: Arc<CrawlConfig>,
    base_url: Url,
}

impl PageFetcher {
    pub fn new(config: Arc<CrawlConfig>, base_url: Url) -> Result<Self> {
        let client = HttpClient::new(config.clone())?;
        let rate_limiter = Arc::new(RateLimiter::per_second(config.requests_per_second));

        Ok(Self {
            client,
            rate_limiter,
            config,
            base_url,
        })
    }

    /// Callers are responsible for the visited check-and-mark and the depth
    /// bound before dispatching; this only fetches and classifies.
    /// Transport errors never propagate, a failed fetch is an expected,
    /// non-fatal event.
    pub async fn fetch(&self, url: Url, depth: u32) -> FetchOutcome {
        self.rate_limiter.acquire().await;

        let html = match self.client.fetch_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%url, error = %e, "fetch failed, skipping page");
                return FetchOutcome::Failed;
            }
        };

        let page = PageParser::parse(&html);
        let links: Vec<Url> = PageParser::extract_links(&html, &url)
            .into_iter()
            .filter(|link| same_authority(link, &self.base_url))
            .collect();

        if !self.matches_keywords(&page.content) {
            debug!(%url, "no keyword match, page excluded from results");
            return FetchOutcome::Skipped { depth, links };
        }

        FetchOutcome::Page(PageRecord {
            url,
            title: page.title,
            content: page.content,
            depth,
            links,
        })
    }

    fn matches_keywords(&self, content: &str) -> bool {
        if self.config.keywords.is_empty() {
            return true;
        }
        let content = content.to_lowercase();
        self.config
            .keywords
            .iter()
            .any(|keyword| content.contains(keyword))
    }
}

/// Same-origin comparison over the network authority: scheme, host and port
/// (with scheme defaults applied by the `url` crate).
pub fn same_authority(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

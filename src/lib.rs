pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod frontier;
pub mod parser;
pub mod rate_limiter;
pub mod scheduler;

pub use client::*;
pub use collector::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use fetcher::*;
pub use frontier::*;
pub use parser::*;
pub use rate_limiter::*;
pub use scheduler::*;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// The finished records of one run plus why it stopped. On cancellation the
/// partial records are still valid and exportable.
#[derive(Debug)]
pub struct CrawlReport {
    pub records: Vec<PageRecord>,
    pub outcome: CrawlOutcome,
}

/// One crawl run: owns the validated configuration and a cancellation
/// token. Every run builds disjoint instances of the frontier, visited set,
/// rate limiter and collector; nothing is shared across runs.
pub struct Crawler {
    config: Arc<CrawlConfig>,
    base_url: Url,
    cancel: CancellationToken,
}

impl Crawler {
    /// Validates the configuration up front; an invalid one never starts a
    /// crawl.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let base_url = config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    /// Token for stopping the run externally. Cancelling mid-batch drops the
    /// in-flight fetches and returns the pages collected so far.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(&self) -> Result<CrawlReport> {
        self.run_with_progress(None).await
    }

    pub async fn run_with_progress(
        &self,
        progress: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<CrawlReport> {
        let fetcher = Arc::new(PageFetcher::new(self.config.clone(), self.base_url.clone())?);
        let scheduler = CrawlScheduler::new(self.config.clone(), fetcher, self.cancel.clone());

        let (records, outcome) = scheduler.run(self.base_url.clone(), progress).await;
        Ok(CrawlReport { records, outcome })
    }
}

use futures::{stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::{Collector, CrawlConfig, FetchOutcome, Frontier, PageFetcher, PageRecord};

/// Emitted once per accepted page, in completion order.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub url: Url,
    pub depth: u32,
}

/// Why the batch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Collected pages reached `max_pages`; remaining frontier abandoned.
    BudgetReached,
    /// Frontier ran dry before the budget was spent.
    Drained,
    /// External cancellation; pages collected so far remain valid.
    Cancelled,
}

/// Drives the breadth-first batch loop: dequeue a FIFO batch, fan out
/// concurrent fetches, wait for the whole batch (the barrier), then merge
/// results into the collector and newly discovered links into the frontier.
pub struct CrawlScheduler {
    config: Arc<CrawlConfig>,
    fetcher: Arc<PageFetcher>,
    cancel: CancellationToken,
}

impl CrawlScheduler {
    pub fn new(
        config: Arc<CrawlConfig>,
        fetcher: Arc<PageFetcher>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            fetcher,
            cancel,
        }
    }

    /// Runs one crawl to completion. Termination is guaranteed: every
    /// iteration either consumes frontier entries or trips a terminal
    /// condition.
    pub async fn run(
        &self,
        seed: Url,
        progress: Option<mpsc::Sender<ProgressEvent>>,
    ) -> (Vec<PageRecord>, CrawlOutcome) {
        let mut frontier = Frontier::new(seed);
        let mut collector = Collector::new();

        let outcome = loop {
            if self.cancel.is_cancelled() {
                break CrawlOutcome::Cancelled;
            }
            if collector.len() >= self.config.max_pages {
                break CrawlOutcome::BudgetReached;
            }
            if frontier.is_empty() {
                break CrawlOutcome::Drained;
            }

            let want = self.config.batch_size.min(self.config.max_pages - collector.len());
            let batch = frontier.next_batch(want, self.config.max_depth);
            if batch.is_empty() {
                // Every dequeued entry was a duplicate or over-depth; the
                // queue shrank, so looping again makes progress.
                continue;
            }

            debug!(batch = batch.len(), pending = frontier.len(), "dispatching batch");

            let fan_out = batch.len();
            let barrier = stream::iter(batch)
                .map(|entry| {
                    let fetcher = self.fetcher.clone();
                    async move { fetcher.fetch(entry.url, entry.depth).await }
                })
                .buffer_unordered(fan_out)
                .collect::<Vec<_>>();

            // Racing the barrier against cancellation drops the in-flight
            // fetch futures, so a stop takes effect mid-batch.
            let results = tokio::select! {
                () = self.cancel.cancelled() => break CrawlOutcome::Cancelled,
                results = barrier => results,
            };

            for result in results {
                match result {
                    FetchOutcome::Page(record) => {
                        if let Some(tx) = &progress {
                            let _ = tx
                                .send(ProgressEvent {
                                    url: record.url.clone(),
                                    depth: record.depth,
                                })
                                .await;
                        }
                        for link in &record.links {
                            frontier.push(link.clone(), record.depth + 1);
                        }
                        collector.add(record);
                    }
                    FetchOutcome::Skipped { depth, links } => {
                        for link in links {
                            frontier.push(link, depth + 1);
                        }
                    }
                    FetchOutcome::Failed => {}
                }
            }
        };

        info!(
            pages = collector.len(),
            ?outcome,
            "crawl finished"
        );
        (collector.into_records(), outcome)
    }
}

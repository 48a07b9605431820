use std::collections::{HashSet, VecDeque};
use tracing::debug;
use url::Url;

/// A URL pending visit, paired with the depth at which it was discovered.
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// FIFO queue of not-yet-fetched URLs plus the visited set.
///
/// A URL enters the visited set at the moment it is dequeued for fetching,
/// not when discovered, so the same URL queued by two parent pages is
/// fetched once and silently dropped the second time. The scheduler task is
/// the sole owner, which makes the check-and-mark atomic without a lock.
///
/// Enqueue does no depth check on purpose: over-depth entries sit in the
/// queue and are dropped at dequeue time, trading frontier space for the
/// original traversal behavior.
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new(seed: Url) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(FrontierEntry { url: seed, depth: 0 });
        Self {
            queue,
            visited: HashSet::new(),
        }
    }

    pub fn push(&mut self, url: Url, depth: u32) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Dequeues up to `limit` entries in FIFO order, dropping those already
    /// visited or beyond `max_depth`, and marks the survivors visited.
    /// Dropped entries are not replaced, so a batch may come back smaller
    /// than `limit` even with a non-empty queue.
    pub fn next_batch(&mut self, limit: usize, max_depth: u32) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(limit.min(self.queue.len()));

        for _ in 0..limit {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            if entry.depth > max_depth {
                debug!(url = %entry.url, depth = entry.depth, "dropping entry beyond max depth");
                continue;
            }
            if !self.visited.insert(entry.url.to_string()) {
                continue;
            }
            batch.push(entry);
        }

        batch
    }
}

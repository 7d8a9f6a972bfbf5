//! Scheduler for the page queue
//!
//! This module handles:
//! - FIFO ordering of pages to fetch (seeds first, then follow-up links)
//! - A visited set so a pagination cycle cannot loop forever
//! - The optional page limit
//! - The minimum delay between consecutive requests

use crate::config::CrawlerConfig;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Scheduler manages the page queue and request pacing
pub struct Scheduler {
    /// Pages waiting to be fetched, in order
    frontier: VecDeque<Url>,

    /// Every URL ever queued or visited (fragment stripped)
    seen: HashSet<String>,

    /// Maximum pages to hand out (0 = unlimited)
    max_pages: u32,

    /// Pages handed out so far
    dispatched: u32,

    /// Minimum time between two requests
    request_delay: Duration,

    /// When the previous page was handed out
    last_request: Option<Instant>,
}

impl Scheduler {
    /// Creates a new scheduler seeded with the given URLs
    ///
    /// Duplicate seeds are queued once.
    pub fn new(config: &CrawlerConfig, seeds: Vec<Url>) -> Self {
        let mut scheduler = Self {
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            max_pages: config.max_pages,
            dispatched: 0,
            request_delay: Duration::from_millis(config.request_delay),
            last_request: None,
        };

        for seed in seeds {
            scheduler.enqueue(seed);
        }

        scheduler
    }

    /// Creates a scheduler from the configured seed strings
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, url::ParseError> {
        let seeds = config
            .seeds
            .iter()
            .map(|seed| Url::parse(seed))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(config, seeds))
    }

    /// Queues a page unless it has been queued or visited before
    ///
    /// # Returns
    ///
    /// `true` if the page was added to the queue
    pub fn enqueue(&mut self, url: Url) -> bool {
        if !self.seen.insert(visit_key(&url)) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Records a URL as visited without queueing it (e.g. a redirect target)
    pub fn mark_visited(&mut self, url: &Url) {
        self.seen.insert(visit_key(url));
    }

    /// Gets the next page to fetch
    ///
    /// Waits until at least `request_delay` has passed since the previous
    /// page was handed out.
    ///
    /// # Returns
    ///
    /// * `Some(Url)` - The next page
    /// * `None` - The queue is empty or the page limit is reached
    pub async fn next_url(&mut self) -> Option<Url> {
        if self.limit_reached() {
            return None;
        }

        let url = self.frontier.pop_front()?;

        if let Some(last) = self.last_request {
            let ready_at = last + self.request_delay;
            if ready_at > Instant::now() {
                tracing::trace!("Waiting {:?} before {}", ready_at - Instant::now(), url);
                tokio::time::sleep_until(ready_at).await;
            }
        }

        self.last_request = Some(Instant::now());
        self.dispatched += 1;
        Some(url)
    }

    /// True when the page limit has been hit
    pub fn limit_reached(&self) -> bool {
        self.max_pages > 0 && self.dispatched >= self.max_pages
    }

    /// Number of pages waiting in the queue
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Number of pages handed out so far
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }
}

fn visit_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_pages: u32, request_delay: u64) -> CrawlerConfig {
        CrawlerConfig {
            seeds: vec![],
            max_pages,
            request_delay,
            request_timeout: 30,
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let mut scheduler = Scheduler::new(
            &config(0, 0),
            vec![url("https://example.com/a"), url("https://example.com/b")],
        );
        scheduler.enqueue(url("https://example.com/c"));

        assert_eq!(scheduler.next_url().await, Some(url("https://example.com/a")));
        assert_eq!(scheduler.next_url().await, Some(url("https://example.com/b")));
        assert_eq!(scheduler.next_url().await, Some(url("https://example.com/c")));
        assert_eq!(scheduler.next_url().await, None);
    }

    #[test]
    fn test_enqueue_rejects_seen_urls() {
        let mut scheduler = Scheduler::new(&config(0, 0), vec![url("https://example.com/?topic=1.0")]);

        assert!(!scheduler.enqueue(url("https://example.com/?topic=1.0")));
        assert!(!scheduler.enqueue(url("https://example.com/?topic=1.0#msg5")));
        assert!(scheduler.enqueue(url("https://example.com/?topic=1.20")));
        assert_eq!(scheduler.frontier_size(), 2);
    }

    #[tokio::test]
    async fn test_visited_page_is_not_requeued() {
        let mut scheduler = Scheduler::new(&config(0, 0), vec![url("https://example.com/?topic=1.0")]);
        scheduler.next_url().await;

        assert!(!scheduler.enqueue(url("https://example.com/?topic=1.0")));
        assert_eq!(scheduler.frontier_size(), 0);
    }

    #[test]
    fn test_mark_visited() {
        let mut scheduler = Scheduler::new(&config(0, 0), vec![]);
        scheduler.mark_visited(&url("https://example.com/final"));
        assert!(!scheduler.enqueue(url("https://example.com/final")));
    }

    #[tokio::test]
    async fn test_page_limit() {
        let mut scheduler = Scheduler::new(
            &config(2, 0),
            vec![
                url("https://example.com/a"),
                url("https://example.com/b"),
                url("https://example.com/c"),
            ],
        );

        assert!(scheduler.next_url().await.is_some());
        assert!(scheduler.next_url().await.is_some());
        assert!(scheduler.limit_reached());
        assert_eq!(scheduler.next_url().await, None);
        assert_eq!(scheduler.dispatched(), 2);
    }

    #[tokio::test]
    async fn test_request_delay_is_respected() {
        let mut scheduler = Scheduler::new(
            &config(0, 50),
            vec![url("https://example.com/a"), url("https://example.com/b")],
        );

        let start = std::time::Instant::now();
        scheduler.next_url().await;
        scheduler.next_url().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_from_config_rejects_bad_seed() {
        let mut cfg = config(0, 0);
        cfg.seeds = vec!["not a url".to_string()];
        assert!(Scheduler::from_config(&cfg).is_err());
    }
}

//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Pulling the next page from the scheduler
//! - Fetching it
//! - Running the extractor and writing records to the sink
//! - Queueing the next page of the thread

use crate::config::Config;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{build_http_client, fetch_page, FetchResult};
use crate::extractor::{resolve_next_page, Page, ThreadExtractor};
use crate::output::{open_sink, CrawlStats, RecordSink};
use crate::TrawlError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<S: RecordSink = Box<dyn RecordSink>> {
    client: Client,
    extractor: ThreadExtractor,
    scheduler: Scheduler,
    sink: S,
    stats: CrawlStats,
}

impl<S: RecordSink> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `sink` - Where extracted records are written
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TrawlError)` - Invalid seed, client or selector setup failure
    pub fn new(config: &Config, sink: S) -> Result<Self, TrawlError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;
        let extractor = ThreadExtractor::new()?;
        let scheduler = Scheduler::from_config(&config.crawler)?;

        Ok(Self {
            client,
            extractor,
            scheduler,
            sink,
            stats: CrawlStats::new(),
        })
    }

    /// Runs the crawl loop until the thread is exhausted
    ///
    /// Fetch failures and pages without the thread layout are logged and
    /// counted; only sink failures abort the run.
    pub async fn run(&mut self) -> Result<CrawlStats, TrawlError> {
        tracing::info!(
            "Starting crawl with {} seed page(s)",
            self.scheduler.frontier_size()
        );

        while let Some(url) = self.scheduler.next_url().await {
            tracing::debug!("Processing URL: {}", url);
            self.stats.last_page = Some(url.to_string());

            match fetch_page(&self.client, &url).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                } => {
                    tracing::debug!(
                        "Fetched {} (HTTP {}, {} bytes)",
                        final_url,
                        status_code,
                        body.len()
                    );
                    if final_url != url {
                        self.scheduler.mark_visited(&final_url);
                    }
                    self.process_page(&Page::new(final_url, body))?;
                }
                failure => {
                    tracing::warn!("Failed to fetch {}: {}", url, failure.describe());
                    self.stats.pages_failed += 1;
                }
            }
        }

        if self.scheduler.limit_reached() {
            tracing::info!(
                "Page limit reached after {} pages",
                self.scheduler.dispatched()
            );
        }

        self.sink.flush()?;
        self.stats.finish();

        tracing::info!(
            "Crawl completed: {} pages processed, {} failed, {} records written",
            self.stats.pages_processed,
            self.stats.pages_failed,
            self.stats.records_emitted
        );

        Ok(self.stats.clone())
    }

    /// Extracts one fetched page, writes its records and queues the next page
    ///
    /// Synchronous on purpose: the parsed document is not `Send` and must not
    /// live across an `.await`.
    fn process_page(&mut self, page: &Page) -> Result<(), TrawlError> {
        let document = page.document();

        let next_page = match self.extractor.extract_document(&document) {
            Ok(extraction) => {
                tracing::info!(
                    "Extracted {} posts from {}",
                    extraction.records.len(),
                    page.url
                );

                for record in &extraction.records {
                    self.sink.write_record(record)?;
                    self.stats.records_emitted += 1;
                    if record.is_degraded() {
                        self.stats.records_degraded += 1;
                    }
                }
                self.sink.flush()?;

                self.stats.pages_processed += 1;
                extraction.next_page
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", page.url, e);
                self.stats.pages_failed += 1;
                // The pagination controls sit outside the post table
                self.extractor.find_next_page(&document)
            }
        };

        self.follow(next_page.as_deref(), &page.url);
        Ok(())
    }

    /// Queues the next page link, if there is one
    fn follow(&mut self, next_page: Option<&str>, base_url: &Url) {
        let Some(href) = next_page else {
            tracing::info!("No next page on {}, thread exhausted", base_url);
            return;
        };

        match resolve_next_page(href, base_url) {
            Some(next_url) => {
                if self.scheduler.enqueue(next_url.clone()) {
                    tracing::debug!("Queued next page: {}", next_url);
                } else {
                    tracing::info!("Next page {} already visited, stopping", next_url);
                }
            }
            None => {
                tracing::warn!("Unusable next page link '{}' on {}", href, base_url);
            }
        }
    }

    /// Statistics so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// The record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the coordinator, returning the record sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Runs the main crawl operation
///
/// Opens the configured output, walks every seed thread and returns the
/// final statistics.
///
/// # Example
///
/// ```no_run
/// use threadwalk::config::load_config;
/// use threadwalk::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("threadwalk.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} records", stats.records_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStats, TrawlError> {
    let sink = open_sink(&config.output)?;
    let mut coordinator = Coordinator::new(&config, sink)?;
    coordinator.run().await
}

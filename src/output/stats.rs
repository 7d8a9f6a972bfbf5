//! Crawl statistics
//!
//! Counters kept by the coordinator while it walks a thread, printed once the
//! crawl is over.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages successfully fetched and extracted
    pub pages_processed: u64,

    /// Pages that failed to fetch or did not have the thread layout
    pub pages_failed: u64,

    /// Records written to the sink
    pub records_emitted: u64,

    /// Records written with sentinel author fields
    pub records_degraded: u64,

    /// URL of the last page visited
    pub last_page: Option<String>,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    /// Creates counters for a crawl starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_processed: 0,
            pages_failed: 0,
            records_emitted: 0,
            records_degraded: 0,
            last_page: None,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total pages attempted
    pub fn pages_total(&self) -> u64 {
        self.pages_processed + self.pages_failed
    }

    /// Duration of the crawl in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of records that carry author metadata
    pub fn metadata_rate(&self) -> f64 {
        if self.records_emitted == 0 {
            return 0.0;
        }
        ((self.records_emitted - self.records_degraded) as f64 / self.records_emitted as f64)
            * 100.0
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout may be carrying the records themselves.
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Pages:");
    eprintln!("  Processed: {}", stats.pages_processed);
    eprintln!("  Failed: {}", stats.pages_failed);
    if let Some(last) = &stats.last_page {
        eprintln!("  Last page: {}", last);
    }
    eprintln!();

    eprintln!("Records:");
    eprintln!("  Emitted: {}", stats.records_emitted);
    eprintln!("  Without author metadata: {}", stats.records_degraded);
    eprintln!(
        "  Author metadata rate: {:.1}%",
        stats.metadata_rate()
    );
    eprintln!();

    eprintln!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        eprintln!("Duration: {}s", seconds);
    }
}

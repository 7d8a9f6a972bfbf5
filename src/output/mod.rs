//! Output module for extracted records and crawl reports
//!
//! This module handles:
//! - The `RecordSink` interface the coordinator writes records to
//! - JSON Lines serialization to a file or stdout
//! - Crawl statistics

mod jsonl;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use stats::{print_statistics, CrawlStats};
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};

use crate::config::OutputConfig;
use std::path::Path;

/// Opens the sink described by the output configuration
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink>)` - stdout for "-", otherwise a new file
/// * `Err(OutputError)` - The output file could not be created
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn RecordSink>> {
    if config.is_stdout() {
        tracing::debug!("Writing records to stdout");
        return Ok(Box::new(JsonLinesSink::stdout()));
    }

    tracing::debug!("Writing records to {}", config.path);
    Ok(Box::new(JsonLinesSink::create(Path::new(&config.path))?))
}

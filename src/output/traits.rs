//! Output sink trait and errors

use crate::extractor::PostRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted post records
///
/// Records arrive one at a time, in crawl order, as soon as each page has been
/// extracted. A sink may buffer; `flush` is called after every page and once
/// more when the crawl ends.
pub trait RecordSink: Send {
    /// Writes a single record
    fn write_record(&mut self, record: &PostRecord) -> OutputResult<()>;

    /// Pushes buffered records to the underlying destination
    fn flush(&mut self) -> OutputResult<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write_record(&mut self, record: &PostRecord) -> OutputResult<()> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> OutputResult<()> {
        (**self).flush()
    }
}

/// Sink that keeps records in memory
///
/// Used by tests and by callers that post-process records themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Records in the order they were written
    pub records: Vec<PostRecord>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn write_record(&mut self, record: &PostRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

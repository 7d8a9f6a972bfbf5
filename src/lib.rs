//! Threadwalk: a forum thread harvester
//!
//! This crate walks a paginated forum thread page by page, extracts one record
//! per post (body text, author activity and merit, timestamp, topic) and writes
//! the records out as JSON Lines.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod output;

use thiserror::Error;

/// Main error type for Threadwalk operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Page-level extraction failures
///
/// Any of these means the page structure is not what a thread page looks like;
/// the page yields no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no table found directly inside a form element")]
    MissingPostTable,

    #[error("post table has no rows")]
    MissingPostRow,

    #[error("first post row has no class attribute")]
    MissingRowClass,

    #[error("invalid selector '{css}': {message}")]
    Selector { css: &'static str, message: String },
}

/// Result type alias for Threadwalk operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{Page, PageExtraction, PostRecord, ThreadExtractor};

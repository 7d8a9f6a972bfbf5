//! Configuration module for Threadwalk
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use threadwalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("threadwalk.toml")).unwrap();
//! println!("Writing posts to: {}", config.output.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_SEED, STDOUT_PATH,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

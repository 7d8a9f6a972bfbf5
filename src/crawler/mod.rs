//! Crawler module for walking a thread page by page
//!
//! This module contains the traversal machinery around the extractor:
//! - HTTP fetching
//! - The page queue and request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, user_agent_string, FetchResult};
pub use scheduler::Scheduler;

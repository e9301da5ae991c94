//! Job intake and result shaping
//!
//! This module handles:
//! - Splitting raw input into an ordered list of website entries
//! - Normalizing entries into crawl targets (scheme, host)
//! - The per-entry result record and final outcome formatting

mod types;

pub use types::{finalize, CrawlJob, CrawlResult, CrawlTarget, NO_EMAIL_FOUND};

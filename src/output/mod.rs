//! Output module for sweep results and summaries
//!
//! This module handles:
//! - Plain text and JSON Lines result listings
//! - Markdown run summaries with outcome statistics

mod report;
mod writer;

pub use report::{write_markdown_report, RunReport};
pub use writer::{write_results_jsonl, write_results_text};

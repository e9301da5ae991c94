//! Link classification for crawl scoping
//!
//! This module handles:
//! - Per-language relevance keyword tables (with config overrides)
//! - Guessing a page's language from its visible text
//! - Deciding which anchors stay internal and look contact-related

mod classify;
mod keywords;

pub use classify::{resolve_anchor, url_netloc, LinkClassifier};
pub use keywords::{guess_language, KeywordTables, Language};

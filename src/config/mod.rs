//! Configuration module for mailsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so runs work without a config file at all.
//!
//! # Example
//!
//! ```no_run
//! use mailsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mailsweep.toml")).unwrap();
//! println!("Fetch cap per site: {}", config.crawler.max_fetches_per_target);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, KeywordsConfig, RenderConfig, RenderEngine,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

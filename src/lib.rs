//! Mailsweep: a contact-email discovery crawler
//!
//! This crate crawls a list of organization websites and extracts contact
//! email addresses from their public pages, combining static fetching with
//! an optional rendered-DOM fallback for script-heavy sites.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod job;
pub mod links;
pub mod output;

use thiserror::Error;

/// Main error type for mailsweep operations
#[derive(Debug, Error)]
pub enum MailsweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
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
}

/// Errors produced while normalizing a job entry into a crawl target
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no host component")]
    MissingHost,
}

/// Errors produced by the rendering fallback engine
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render engine failure: {0}")]
    Engine(String),

    #[error("Render timed out for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} while rendering {url}")]
    Http { status: u16, url: String },
}

/// Result type alias for mailsweep operations
pub type Result<T> = std::result::Result<T, MailsweepError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOrchestrator, RenderFetcher, SiteCrawler};
pub use job::{CrawlJob, CrawlResult, CrawlTarget, NO_EMAIL_FOUND};

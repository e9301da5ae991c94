//! Crawler module for web page fetching and processing
//!
//! This module contains the core sweep logic, including:
//! - HTTP fetching and error classification
//! - The per-site crawl loop with its rendered-DOM fallback
//! - The rendering capability boundary
//! - Job-level orchestration, batching, and worker pooling

mod fetcher;
mod orchestrator;
mod render;
mod site;

pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use orchestrator::{worker_pool_size, CrawlOrchestrator};
pub use render::{build_renderer, RenderFetcher, StaticRenderer};
pub use site::SiteCrawler;

#[cfg(feature = "headless")]
pub use render::HeadlessRenderer;

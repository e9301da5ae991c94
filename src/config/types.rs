use serde::Deserialize;

/// Default User-Agent sent with every page fetch.
///
/// A desktop-browser identity; many sites serve reduced content to
/// obvious bot identifiers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// Main configuration structure for mailsweep
///
/// Every section and field has a default, so an absent or partial config
/// file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

/// Crawl and batching behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound on page fetches per target site
    #[serde(rename = "max-fetches-per-target", default = "defaults::max_fetches_per_target")]
    pub max_fetches_per_target: usize,

    /// Number of targets processed concurrently per batch
    #[serde(rename = "batch-size", default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-pause-ms", default = "defaults::batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Hard ceiling on the worker pool regardless of job size
    #[serde(rename = "workers-cap", default = "defaults::workers_cap")]
    pub workers_cap: usize,
}

/// HTTP fetcher behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header value sent on every request
    #[serde(rename = "user-agent", default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "defaults::fetch_timeout_secs")]
    pub timeout_secs: u64,
}

/// Engine the fallback pass renders with
///
/// `headless` requires a build carrying the `headless` feature;
/// `static` is available in every build and forces the plain-HTTP
/// engine even when a browser is compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderEngine {
    Static,
    Headless,
}

impl RenderEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderEngine::Static => "static",
            RenderEngine::Headless => "headless",
        }
    }
}

/// Rendered-DOM fallback behavior
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Whether the fallback pass runs at all
    #[serde(default = "defaults::render_enabled")]
    pub enabled: bool,

    /// Engine preference, defaulting to the best one the build carries
    #[serde(default = "defaults::render_engine")]
    pub engine: RenderEngine,

    /// Concurrent render slots, shared across all targets
    #[serde(rename = "pool-size", default = "defaults::render_pool_size")]
    pub pool_size: usize,

    /// How many discovered relevant subpages the fallback pass may render
    #[serde(rename = "max-subpages", default = "defaults::render_max_subpages")]
    pub max_subpages: usize,

    /// Minimum polite delay between subpage renders (milliseconds)
    #[serde(rename = "pause-min-ms", default = "defaults::render_pause_min_ms")]
    pub pause_min_ms: u64,

    /// Maximum polite delay between subpage renders (milliseconds)
    #[serde(rename = "pause-max-ms", default = "defaults::render_pause_max_ms")]
    pub pause_max_ms: u64,

    /// Per-render timeout (seconds)
    #[serde(rename = "timeout-secs", default = "defaults::render_timeout_secs")]
    pub timeout_secs: u64,
}

/// Optional per-language keyword overrides for link relevance
///
/// A language left unset keeps the built-in table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default)]
    pub english: Option<Vec<String>>,
    #[serde(default)]
    pub german: Option<Vec<String>>,
    #[serde(default)]
    pub french: Option<Vec<String>>,
    #[serde(default)]
    pub spanish: Option<Vec<String>>,
}

mod defaults {
    pub fn max_fetches_per_target() -> usize {
        40
    }
    pub fn batch_size() -> usize {
        10
    }
    pub fn batch_pause_ms() -> u64 {
        1000
    }
    pub fn workers_cap() -> usize {
        20
    }
    pub fn user_agent() -> String {
        super::DEFAULT_USER_AGENT.to_string()
    }
    pub fn fetch_timeout_secs() -> u64 {
        10
    }
    pub fn render_enabled() -> bool {
        true
    }
    pub fn render_engine() -> super::RenderEngine {
        #[cfg(feature = "headless")]
        {
            super::RenderEngine::Headless
        }
        #[cfg(not(feature = "headless"))]
        {
            super::RenderEngine::Static
        }
    }
    pub fn render_pool_size() -> usize {
        2
    }
    pub fn render_max_subpages() -> usize {
        3
    }
    pub fn render_pause_min_ms() -> u64 {
        1000
    }
    pub fn render_pause_max_ms() -> u64 {
        2000
    }
    pub fn render_timeout_secs() -> u64 {
        20
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_fetches_per_target: defaults::max_fetches_per_target(),
            batch_size: defaults::batch_size(),
            batch_pause_ms: defaults::batch_pause_ms(),
            workers_cap: defaults::workers_cap(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::fetch_timeout_secs(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::render_enabled(),
            engine: defaults::render_engine(),
            pool_size: defaults::render_pool_size(),
            max_subpages: defaults::render_max_subpages(),
            pause_min_ms: defaults::render_pause_min_ms(),
            pause_max_ms: defaults::render_pause_max_ms(),
            timeout_secs: defaults::render_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.crawler.max_fetches_per_target, 40);
        assert_eq!(config.crawler.batch_size, 10);
        assert_eq!(config.fetcher.timeout_secs, 10);
        assert!(config.fetcher.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.render.enabled);
        assert_eq!(config.render.max_subpages, 3);
        assert!(config.keywords.english.is_none());
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let config: Config = toml::from_str(
            r#"
[crawler]
batch-size = 25
"#,
        )
        .unwrap();

        assert_eq!(config.crawler.batch_size, 25);
        assert_eq!(config.crawler.max_fetches_per_target, 40);
        assert_eq!(config.crawler.workers_cap, 20);
    }

    #[test]
    fn test_empty_document_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.pool_size, 2);
    }

    #[test]
    fn test_render_engine_parses_from_config() {
        let config: Config = toml::from_str(
            r#"
[render]
engine = "static"
"#,
        )
        .unwrap();

        assert_eq!(config.render.engine, RenderEngine::Static);
    }

    #[cfg(not(feature = "headless"))]
    #[test]
    fn test_default_engine_matches_build() {
        assert_eq!(Config::default().render.engine, RenderEngine::Static);
    }

    #[cfg(feature = "headless")]
    #[test]
    fn test_default_engine_matches_build() {
        assert_eq!(Config::default().render.engine, RenderEngine::Headless);
    }
}

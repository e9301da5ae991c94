//! Rendered-DOM fetching capability
//!
//! The fallback pass needs "URL in, final HTML out" and nothing else, so
//! the engine sits behind a small trait:
//! - [`StaticRenderer`] re-fetches over plain HTTP (every build)
//! - `HeadlessRenderer` drives a shared Chromium instance through the CDP
//!   (builds with the `headless` feature)
//!
//! `render.engine` picks between the compiled-in engines at startup.

use crate::config::Config;
use crate::RenderError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A source of fully rendered page HTML
///
/// Implementations must be cheap to share across crawl tasks; expensive
/// engines should pool their real resources internally.
#[async_trait]
pub trait RenderFetcher: Send + Sync {
    /// Fetches the given URL and returns the final HTML
    async fn render(&self, url: &Url) -> Result<String, RenderError>;

    /// Engine name for logs
    fn name(&self) -> &'static str;
}

/// Plain-HTTP renderer used when no browser engine is compiled in
///
/// Gives script-free sites a second chance (transient failures during the
/// primary pass) without pulling in a browser.
pub struct StaticRenderer {
    client: Client,
    timeout: Duration,
}

impl StaticRenderer {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl RenderFetcher for StaticRenderer {
    async fn render(&self, url: &Url) -> Result<String, RenderError> {
        let fetch = async {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| RenderError::Engine(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RenderError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| RenderError::Engine(e.to_string()))
        };

        tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
            })?
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(feature = "headless")]
pub use headless::HeadlessRenderer;

#[cfg(feature = "headless")]
mod headless {
    use super::*;
    use crate::config::RenderConfig;
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use tokio::sync::OnceCell;

    // Global browser instance to avoid re-launching Chrome on every render.
    static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

    // Asynchronously gets or initializes the shared browser instance.
    // This function ensures that the browser is launched only once.
    async fn get_browser() -> Result<&'static Browser, RenderError> {
        BROWSER_INSTANCE
            .get_or_try_init(|| async {
                let browser_config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(RenderError::Engine)?;

                let (browser, mut handler) = Browser::launch(browser_config)
                    .await
                    .map_err(|e| RenderError::Engine(e.to_string()))?;

                // Spawn a handler to process browser events
                tokio::spawn(async move {
                    while let Some(h) = handler.next().await {
                        if h.is_err() {
                            break;
                        }
                    }
                });

                Ok(browser)
            })
            .await
    }

    /// Chromium-backed renderer for script-assembled pages
    pub struct HeadlessRenderer {
        user_agent: String,
        timeout: Duration,
    }

    impl HeadlessRenderer {
        pub fn new(config: &RenderConfig, user_agent: &str) -> Self {
            Self {
                user_agent: user_agent.to_string(),
                timeout: Duration::from_secs(config.timeout_secs),
            }
        }

        async fn render_on_page(&self, page: &Page, url: &str) -> Result<String, RenderError> {
            page.set_user_agent(self.user_agent.as_str())
                .await
                .map_err(|e| RenderError::Engine(e.to_string()))?;

            // goto waits for the load event by default
            page.goto(url)
                .await
                .map_err(|e| RenderError::Engine(e.to_string()))?;

            page.content()
                .await
                .map_err(|e| RenderError::Engine(e.to_string()))
        }
    }

    #[async_trait]
    impl RenderFetcher for HeadlessRenderer {
        async fn render(&self, url: &Url) -> Result<String, RenderError> {
            let target = url.to_string();

            let rendered = tokio::time::timeout(self.timeout, async {
                let browser = get_browser().await?;

                let page = browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RenderError::Engine(e.to_string()))?;

                let outcome = self.render_on_page(&page, &target).await;

                if let Err(e) = page.close().await {
                    tracing::debug!("Failed to close render page for {}: {}", target, e);
                }

                outcome
            })
            .await;

            match rendered {
                Ok(result) => result,
                Err(_) => Err(RenderError::Timeout { url: target }),
            }
        }

        fn name(&self) -> &'static str {
            "headless"
        }
    }
}

/// Builds the rendering capability `render.engine` selects
#[cfg(feature = "headless")]
pub fn build_renderer(config: &Config, client: &Client) -> Arc<dyn RenderFetcher> {
    match config.render.engine {
        crate::config::RenderEngine::Static => Arc::new(StaticRenderer::new(
            client.clone(),
            Duration::from_secs(config.render.timeout_secs),
        )),
        crate::config::RenderEngine::Headless => Arc::new(HeadlessRenderer::new(
            &config.render,
            &config.fetcher.user_agent,
        )),
    }
}

/// Builds the rendering capability `render.engine` selects
///
/// This build carries only the static engine; config validation has
/// already rejected a `headless` selection.
#[cfg(not(feature = "headless"))]
pub fn build_renderer(config: &Config, client: &Client) -> Arc<dyn RenderFetcher> {
    Arc::new(StaticRenderer::new(
        client.clone(),
        Duration::from_secs(config.render.timeout_secs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_renderer_returns_shared_capability() {
        let config = Config::default();
        let client = Client::new();
        let renderer = build_renderer(&config, &client);
        assert!(!renderer.name().is_empty());
    }

    #[cfg(not(feature = "headless"))]
    #[test]
    fn test_default_build_uses_static_renderer() {
        let config = Config::default();
        let client = Client::new();
        let renderer = build_renderer(&config, &client);
        assert_eq!(renderer.name(), "static");
    }

    #[cfg(feature = "headless")]
    #[test]
    fn test_static_engine_override_in_headless_build() {
        let mut config = Config::default();
        config.render.engine = crate::config::RenderEngine::Static;
        let client = Client::new();
        let renderer = build_renderer(&config, &client);
        assert_eq!(renderer.name(), "static");
    }
}

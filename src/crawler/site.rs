//! Per-target crawl loop
//!
//! One SiteCrawler sweeps one website: breadth-first over relevant
//! internal links, accumulating every email it can extract, with a
//! rendered-DOM fallback when the static pass comes up empty.

use crate::config::Config;
use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::crawler::render::RenderFetcher;
use crate::extract::{extract_emails, page_text};
use crate::job::{self, CrawlTarget};
use crate::links::{guess_language, resolve_anchor, KeywordTables, LinkClassifier};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Crawls a single target site and produces its outcome string
///
/// All mutable crawl state (visited set, email set, queue) is local to
/// one `crawl` call, so a crawler can be shared freely across tasks.
pub struct SiteCrawler {
    client: Client,
    config: Arc<Config>,
    tables: Arc<KeywordTables>,
    renderer: Option<Arc<dyn RenderFetcher>>,
    render_permits: Arc<Semaphore>,
}

/// What one parsed page contributes to the crawl
struct PageAnalysis {
    emails: BTreeSet<String>,
    relevant_links: Vec<Url>,
}

impl SiteCrawler {
    pub fn new(
        client: Client,
        config: Arc<Config>,
        tables: Arc<KeywordTables>,
        renderer: Option<Arc<dyn RenderFetcher>>,
        render_permits: Arc<Semaphore>,
    ) -> Self {
        Self {
            client,
            config,
            tables,
            renderer,
            render_permits,
        }
    }

    /// Sweeps the target and returns the final outcome string
    ///
    /// Fetch and parse failures contribute nothing and never abort the
    /// sweep; the worst case is the no-result sentinel.
    pub async fn crawl(&self, target: &CrawlTarget) -> String {
        let classifier = LinkClassifier::new(target.domain.clone(), Arc::clone(&self.tables));

        let mut emails: BTreeSet<String> = BTreeSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<Url> = VecDeque::new();
        let mut relevant_seen: Vec<Url> = Vec::new();
        let mut fetches = 0usize;

        queue.push_back(target.url.clone());

        while let Some(url) = queue.pop_front() {
            if fetches >= self.config.crawler.max_fetches_per_target {
                tracing::debug!(
                    "Fetch cap reached for {} after {} pages, stopping sweep",
                    target.domain,
                    fetches
                );
                break;
            }

            // Fragments address positions inside a page, not new pages
            if !visited.insert(visited_key(&url)) {
                continue;
            }

            fetches += 1;

            match fetch_page(&self.client, &url).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                } => {
                    tracing::debug!("Fetched {} ({}, final URL {})", url, status_code, final_url);

                    let analysis = analyze_page(&body, &url, &classifier);
                    emails.extend(analysis.emails);

                    for link in analysis.relevant_links {
                        if !relevant_seen.contains(&link) {
                            relevant_seen.push(link.clone());
                        }
                        queue.push_back(link);
                    }
                }
                FetchResult::HttpError { status_code } => {
                    tracing::debug!("Skipping {} after HTTP {}", url, status_code);
                }
                FetchResult::NetworkError { error } => {
                    tracing::debug!("Skipping {} after network error: {}", url, error);
                }
            }
        }

        if emails.is_empty() {
            if let Some(renderer) = self.renderer.clone() {
                self.fallback_pass(target, &classifier, &renderer, &mut relevant_seen, &mut emails)
                    .await;
            }
        }

        job::finalize(&emails)
    }

    /// Rendered-DOM second pass over the base page and a few subpages
    ///
    /// Runs whenever the static pass found nothing, so genuinely empty
    /// sites pay the rendering cost too. Subpage renders are spaced with
    /// a random pause to keep the load on the target site polite.
    async fn fallback_pass(
        &self,
        target: &CrawlTarget,
        classifier: &LinkClassifier,
        renderer: &Arc<dyn RenderFetcher>,
        relevant_seen: &mut Vec<Url>,
        emails: &mut BTreeSet<String>,
    ) {
        tracing::info!(
            "No emails from static pass for {}, falling back to '{}' rendering",
            target.domain,
            renderer.name()
        );

        if let Some(html) = self.render_one(renderer, &target.url).await {
            let analysis = analyze_page(&html, &target.url, classifier);
            emails.extend(analysis.emails);

            // Script-built menus often surface contact links the static
            // pass never saw
            for link in analysis.relevant_links {
                if !relevant_seen.contains(&link) {
                    relevant_seen.push(link);
                }
            }
        }

        let mut picked: HashSet<String> = HashSet::new();
        picked.insert(visited_key(&target.url));

        let subpages: Vec<Url> = relevant_seen
            .iter()
            .filter(|candidate| picked.insert(visited_key(candidate)))
            .take(self.config.render.max_subpages)
            .cloned()
            .collect();

        for url in subpages {
            let pause = rand::random_range(
                self.config.render.pause_min_ms..=self.config.render.pause_max_ms,
            );
            tokio::time::sleep(Duration::from_millis(pause)).await;

            if let Some(html) = self.render_one(renderer, &url).await {
                let analysis = analyze_page(&html, &url, classifier);
                emails.extend(analysis.emails);
            }
        }
    }

    /// Renders one URL under the shared render pool
    async fn render_one(&self, renderer: &Arc<dyn RenderFetcher>, url: &Url) -> Option<String> {
        let _permit = match self.render_permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return None,
        };

        match renderer.render(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::debug!("Render failed for {}: {}", url, e);
                None
            }
        }
    }
}

/// Parses a fetched body and pulls out emails plus followable links
///
/// Parsing stays synchronous and self-contained: the parsed document
/// never crosses an await point.
fn analyze_page(body: &str, page_url: &Url, classifier: &LinkClassifier) -> PageAnalysis {
    let document = Html::parse_document(body);

    let language = guess_language(&page_text(&document));
    let emails = extract_emails(&document);

    let mut relevant_links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_anchor(href, page_url) {
                    if classifier.is_internal(&resolved) {
                        let text = element.text().collect::<Vec<_>>().join(" ");
                        if classifier.is_relevant(&text, resolved.path(), language) {
                            relevant_links.push(resolved);
                        }
                    }
                }
            }
        }
    }

    PageAnalysis {
        emails,
        relevant_links,
    }
}

/// Key under which a URL counts as visited
fn visited_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.to_string()
}

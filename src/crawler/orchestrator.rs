//! Job-level crawl orchestration
//!
//! This module handles:
//! - Sizing the worker pool from the job size
//! - Batched, bounded-concurrency execution across targets
//! - Per-entry error containment (one result per input entry, always)
//! - Cooperative cancellation between batches

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::render::{build_renderer, RenderFetcher};
use crate::crawler::site::SiteCrawler;
use crate::job::{CrawlJob, CrawlResult, CrawlTarget};
use crate::links::KeywordTables;
use crate::MailsweepError;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome recorded for entries still pending when a job is cancelled
const CANCELLED_OUTCOME: &str = "Error: job cancelled";

/// Runs a whole job of crawl targets and returns results in input order
pub struct CrawlOrchestrator {
    config: Arc<Config>,
    client: Client,
    tables: Arc<KeywordTables>,
    renderer: Option<Arc<dyn RenderFetcher>>,
    render_permits: Arc<Semaphore>,
    cancelled: Arc<AtomicBool>,
}

impl CrawlOrchestrator {
    /// Builds an orchestrator from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The sweep configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOrchestrator)` - Ready to run jobs
    /// * `Err(MailsweepError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, MailsweepError> {
        let client = build_http_client(&config.fetcher)?;
        let tables = Arc::new(KeywordTables::with_overrides(&config.keywords));

        let renderer = if config.render.enabled {
            Some(build_renderer(&config, &client))
        } else {
            None
        };

        let render_permits = Arc::new(Semaphore::new(config.render.pool_size));

        Ok(Self {
            config: Arc::new(config),
            client,
            tables,
            renderer,
            render_permits,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the rendering capability
    ///
    /// Lets callers plug in their own engine behind the same fallback
    /// logic, which is also how the test suite injects a scripted one.
    pub fn with_renderer(mut self, renderer: Arc<dyn RenderFetcher>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Shared flag that stops the job at the next batch boundary
    ///
    /// Typically handed to a ctrl-c handler. Entries that never ran get
    /// a cancellation error as their outcome.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Runs every entry in the job and returns one result per entry
    ///
    /// Entries keep their input order. A panicking or failing target
    /// degrades to an error string in its own row and never disturbs
    /// its siblings. A cancellation is consumed by the run that observes
    /// it, so the next job on the same orchestrator starts fresh.
    pub async fn run(&self, job: &CrawlJob) -> Vec<CrawlResult> {
        if job.is_empty() {
            return Vec::new();
        }

        let workers = worker_pool_size(job.len(), &self.config.crawler);
        tracing::info!(
            "Sweeping {} entries with {} workers",
            job.len(),
            workers
        );

        let worker_permits = Arc::new(Semaphore::new(workers));
        let mut outcomes: Vec<Option<String>> = vec![None; job.len()];

        let batch_size = self.config.crawler.batch_size.max(1);

        for (batch_index, batch) in job.entries().chunks(batch_size).enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::info!("Cancellation requested, stopping before batch {}", batch_index + 1);
                break;
            }

            if batch_index > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.crawler.batch_pause_ms)).await;
            }

            tracing::debug!(
                "Starting batch {} ({} entries)",
                batch_index + 1,
                batch.len()
            );

            let mut tasks: JoinSet<(usize, String)> = JoinSet::new();
            let mut task_index: HashMap<tokio::task::Id, usize> = HashMap::new();

            for (offset, raw) in batch.iter().enumerate() {
                let index = batch_index * batch_size + offset;

                // Blank input rows stay blank in the output
                if raw.trim().is_empty() {
                    outcomes[index] = Some(String::new());
                    continue;
                }

                let raw = raw.clone();
                let permits = Arc::clone(&worker_permits);
                let crawler = self.site_crawler();

                let handle = tasks.spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return (index, "Error: worker pool closed".to_string()),
                    };

                    let outcome = match CrawlTarget::from_raw(&raw) {
                        Ok(target) => crawler.crawl(&target).await,
                        Err(_) => format!("Error: invalid URL '{}'", raw.trim()),
                    };

                    (index, outcome)
                });

                task_index.insert(handle.id(), index);
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, outcome)) => outcomes[index] = Some(outcome),
                    Err(join_error) => {
                        // A panicked target still yields a row for its entry
                        if let Some(&index) = task_index.get(&join_error.id()) {
                            tracing::warn!("Crawl task for entry {} failed: {}", index, join_error);
                            outcomes[index] = Some(format!("Error: {}", join_error));
                        }
                    }
                }
            }
        }

        // A cancellation only applies to the run that observed it
        self.cancelled.store(false, Ordering::SeqCst);

        outcomes
            .into_iter()
            .zip(job.entries().iter())
            .enumerate()
            .map(|(index, (outcome, raw))| CrawlResult {
                index,
                input: raw.clone(),
                outcome: outcome.unwrap_or_else(|| CANCELLED_OUTCOME.to_string()),
            })
            .collect()
    }

    fn site_crawler(&self) -> SiteCrawler {
        SiteCrawler::new(
            self.client.clone(),
            Arc::clone(&self.config),
            Arc::clone(&self.tables),
            self.renderer.clone(),
            Arc::clone(&self.render_permits),
        )
    }
}

/// Picks the worker pool size for a job
///
/// Small jobs stay gentle, big jobs climb a staircase: 5 workers up to
/// 100 entries, 10 up to 300, 20 beyond that, clamped by the configured
/// cap.
pub fn worker_pool_size(job_len: usize, config: &CrawlerConfig) -> usize {
    let scaled = if job_len <= 100 {
        5
    } else if job_len <= 300 {
        10
    } else {
        20
    };

    scaled.min(config.workers_cap.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_size_staircase() {
        let config = CrawlerConfig::default();

        assert_eq!(worker_pool_size(1, &config), 5);
        assert_eq!(worker_pool_size(100, &config), 5);
        assert_eq!(worker_pool_size(101, &config), 10);
        assert_eq!(worker_pool_size(300, &config), 10);
        assert_eq!(worker_pool_size(301, &config), 20);
        assert_eq!(worker_pool_size(5000, &config), 20);
    }

    #[test]
    fn test_worker_pool_size_respects_cap() {
        let config = CrawlerConfig {
            workers_cap: 3,
            ..Default::default()
        };

        assert_eq!(worker_pool_size(50, &config), 3);
        assert_eq!(worker_pool_size(1000, &config), 3);
    }

    #[test]
    fn test_worker_pool_size_never_zero() {
        let config = CrawlerConfig {
            workers_cap: 0,
            ..Default::default()
        };

        assert_eq!(worker_pool_size(10, &config), 1);
    }

    #[tokio::test]
    async fn test_run_empty_job() {
        let orchestrator = CrawlOrchestrator::new(Config::default()).unwrap();
        let results = orchestrator.run(&CrawlJob::from_entries(vec![])).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_run_blank_entries_stay_blank() {
        let mut config = Config::default();
        config.render.enabled = false;

        let orchestrator = CrawlOrchestrator::new(config).unwrap();
        let job = CrawlJob::from_entries(vec!["".to_string(), "   ".to_string()]);
        let results = orchestrator.run(&job).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].outcome, "");
        assert_eq!(results[1].outcome, "");
    }

    #[tokio::test]
    async fn test_run_invalid_entry_yields_error_row() {
        let mut config = Config::default();
        config.render.enabled = false;

        let orchestrator = CrawlOrchestrator::new(config).unwrap();
        let job = CrawlJob::from_entries(vec!["http://".to_string()]);
        let results = orchestrator.run(&job).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].outcome.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_cancelled_job_marks_pending_entries() {
        let mut config = Config::default();
        config.render.enabled = false;

        let orchestrator = CrawlOrchestrator::new(config).unwrap();
        orchestrator.cancel_flag().store(true, Ordering::SeqCst);

        let job = CrawlJob::from_entries(vec!["example.com".to_string()]);
        let results = orchestrator.run(&job).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, CANCELLED_OUTCOME);
    }

    #[tokio::test]
    async fn test_cancellation_is_consumed_by_the_run_it_stops() {
        let mut config = Config::default();
        config.render.enabled = false;

        let orchestrator = CrawlOrchestrator::new(config).unwrap();
        orchestrator.cancel_flag().store(true, Ordering::SeqCst);

        let first = orchestrator
            .run(&CrawlJob::from_entries(vec!["example.com".to_string()]))
            .await;
        assert_eq!(first[0].outcome, CANCELLED_OUTCOME);

        // The same orchestrator accepts the next job as a fresh run
        let second = orchestrator
            .run(&CrawlJob::from_entries(vec!["".to_string()]))
            .await;
        assert_eq!(second[0].outcome, "");
    }
}

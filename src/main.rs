//! Mailsweep main entry point
//!
//! This is the command-line interface for the mailsweep contact crawler.

use anyhow::Context;
use clap::Parser;
use mailsweep::config::{load_config_with_hash, Config};
use mailsweep::crawler::{worker_pool_size, CrawlOrchestrator};
use mailsweep::job::CrawlJob;
use mailsweep::output::{
    write_markdown_report, write_results_jsonl, write_results_text, RunReport,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mailsweep: contact email discovery for website lists
///
/// Mailsweep takes a file of website URLs (one per line), sweeps each
/// site's contact-related pages, and reports every email address it can
/// find, with a rendered-DOM fallback for script-heavy sites.
#[derive(Parser, Debug)]
#[command(name = "mailsweep")]
#[command(version = "0.1.0")]
#[command(about = "Contact email discovery for website lists", long_about = None)]
struct Cli {
    /// Path to the input file, one website per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write results as JSON Lines to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write a markdown run summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Disable the rendered-DOM fallback pass
    #[arg(long)]
    no_render: bool,

    /// Validate config and show what would be swept without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration; defaults apply without a file
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if cli.no_render {
        config.render.enabled = false;
    }

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;
    let job = CrawlJob::from_lines(&input);

    if cli.dry_run {
        handle_dry_run(&config, &job);
        return Ok(());
    }

    let orchestrator =
        CrawlOrchestrator::new(config).context("failed to build crawl orchestrator")?;

    // Ctrl-C stops the sweep at the next batch boundary; entries that
    // never ran are reported as cancelled
    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current batch before stopping");
            cancel.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    let started_at = chrono::Utc::now();
    let results = orchestrator.run(&job).await;
    let finished_at = chrono::Utc::now();

    let mut stdout = std::io::stdout().lock();
    write_results_text(&mut stdout, &results).context("failed to write results")?;

    if let Some(path) = &cli.output {
        write_results_jsonl(path, &results)
            .with_context(|| format!("failed to write JSON Lines results to {}", path.display()))?;
        tracing::info!("Results written to {}", path.display());
    }

    let report = RunReport::from_results(&results, started_at, finished_at, config_hash);

    if let Some(path) = &cli.summary {
        write_markdown_report(&report, path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    tracing::info!(
        "Swept {} entries in {}s: {} with emails, {} without, {} errors",
        report.total_entries,
        report.duration_seconds(),
        report.with_emails,
        report.without_emails,
        report.errored
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailsweep=info,warn"),
            1 => EnvFilter::new("mailsweep=debug,info"),
            2 => EnvFilter::new("mailsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be swept
fn handle_dry_run(config: &Config, job: &CrawlJob) {
    println!("=== Mailsweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max fetches per target: {}",
        config.crawler.max_fetches_per_target
    );
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Batch pause: {}ms", config.crawler.batch_pause_ms);
    println!("  Workers cap: {}", config.crawler.workers_cap);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nRender Fallback:");
    println!("  Enabled: {}", config.render.enabled);
    println!("  Engine: {}", config.render.engine.as_str());
    println!("  Pool size: {}", config.render.pool_size);
    println!("  Max subpages: {}", config.render.max_subpages);
    println!(
        "  Pause between renders: {}-{}ms",
        config.render.pause_min_ms, config.render.pause_max_ms
    );

    let entries = job
        .entries()
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .count();
    let workers = worker_pool_size(job.len(), &config.crawler);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would sweep {} entries ({} blank) with {} workers",
        entries,
        job.len() - entries,
        workers
    );
}

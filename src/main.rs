//! Reel-Ripple main entry point
//!
//! This is the command-line interface for the Reel-Ripple episode crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use reel_ripple::config::{load_config_with_hash, Config, CrawlMode};
use reel_ripple::crawler::{run_crawl, Coordinator, RunOptions};
use reel_ripple::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reel-Ripple: a resumable episode crawler
///
/// Walks category listings down to episode pages, resolves each episode's
/// video source and records the results. Progress is checkpointed after
/// every show, so an interrupted crawl picks up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "reel-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A resumable episode crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List shows per category and what would be extracted, without extracting
    #[arg(long)]
    dry_run: bool,

    /// Extract shows even if the catalog or history already has them
    #[arg(long)]
    force: bool,

    /// Ignore any existing checkpoint and start over
    #[arg(long)]
    fresh: bool,

    /// Override the configured crawl mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    SkipExtracted,
    MissingOnly,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SkipExtracted => CrawlMode::SkipExtracted,
            ModeArg::MissingOnly => CrawlMode::MissingOnly,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let options = RunOptions {
        force: cli.force,
        fresh: cli.fresh,
        mode: cli.mode.map(CrawlMode::from),
        config_hash: Some(config_hash),
    };

    if cli.dry_run {
        handle_dry_run(config, options).await
    } else {
        handle_crawl(config, options).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_ripple=info,warn"),
            1 => EnvFilter::new("reel_ripple=debug,info"),
            2 => EnvFilter::new("reel_ripple=trace,debug"),
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

/// Handles --dry-run: lists categories and what a crawl would extract
async fn handle_dry_run(config: Config, options: RunOptions) -> anyhow::Result<()> {
    println!("=== Reel-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Episode retries: {}", config.crawler.episode_retries);
    println!(
        "  Delays: episode {}ms, show {}ms, listing page {}ms, retry {}ms",
        config.crawler.episode_delay_ms,
        config.crawler.show_delay_ms,
        config.crawler.page_delay_ms,
        config.crawler.retry_delay_ms
    );
    println!(
        "  Listing pages: up to {} (?{}=N)",
        config.crawler.max_listing_pages, config.crawler.page_param
    );

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!("  Checkpoint: {}", config.output.checkpoint_path);
    println!("  History: {}", config.output.history_path);

    let mut coordinator = Coordinator::new(config, options)?;
    println!(
        "\nMode: {:?}{}",
        coordinator.mode(),
        if coordinator.checkpoint().has_progress() {
            " (resuming from checkpoint)"
        } else {
            ""
        }
    );

    for preview in coordinator.preview().await {
        println!(
            "\n{}: {} shows, {} to extract, {} skipped",
            preview.category,
            preview.known.len() + preview.missing.len(),
            preview.missing.len(),
            preview.known.len()
        );
        for show in &preview.missing {
            println!("  + {}", show.name);
        }
        for show in &preview.known {
            println!("  - {}", show.name);
        }
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, options: RunOptions) -> anyhow::Result<()> {
    if options.fresh {
        tracing::info!("Starting fresh crawl (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume if a checkpoint exists)");
    }
    tracing::info!("Categories: {}", config.categories.len());

    let outcome = run_crawl(config, options).await?;

    print_statistics(&outcome.statistics);
    match &outcome.results_path {
        Some(path) => println!("\n✓ Results written to: {}", path.display()),
        None => println!("\n✗ Results could not be written; checkpoint kept for the next run"),
    }

    Ok(())
}

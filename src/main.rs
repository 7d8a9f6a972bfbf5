//! Threadwalk main entry point
//!
//! This is the command-line interface for the Threadwalk thread harvester.

use clap::Parser;
use std::path::PathBuf;
use threadwalk::config::{load_config_with_hash, validate, Config};
use threadwalk::crawler::{run_crawl, user_agent_string};
use threadwalk::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Threadwalk: a forum thread harvester
///
/// Threadwalk walks a paginated forum thread from its first page to its last,
/// extracting every post with its author's activity and merit, and writes one
/// JSON object per post.
#[derive(Parser, Debug)]
#[command(name = "threadwalk")]
#[command(version)]
#[command(about = "A forum thread harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Thread URL to start from; repeat for several threads (overrides config)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Output file for JSON Lines records, "-" for stdout (overrides config)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Stop after this many pages, 0 for no limit (overrides config)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    (cfg, Some(hash))
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            (Config::default(), None)
        }
    };

    apply_overrides(&mut config, &cli);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config, config_hash.as_deref());
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for records when the output is "-".
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("threadwalk=info,warn"),
            1 => EnvFilter::new("threadwalk=debug,info"),
            2 => EnvFilter::new("threadwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.seeds.is_empty() {
        config.crawler.seeds = cli.seeds.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, config_hash: Option<&str>) {
    println!("=== Threadwalk Dry Run ===\n");

    if let Some(hash) = config_hash {
        println!("Configuration hash: {}\n", hash);
    }

    println!("Crawler Configuration:");
    match config.crawler.max_pages {
        0 => println!("  Max pages: unlimited"),
        n => println!("  Max pages: {}", n),
    }
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", user_agent_string(&config.user_agent));

    println!("\nOutput:");
    if config.output.is_stdout() {
        println!("  stdout");
    } else {
        println!("  {}", config.output.path);
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Total seed URLs: {}", config.crawler.seeds.len());

    match run_crawl(config).await {
        Ok(stats) => {
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

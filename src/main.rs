//! Sumi-Robots main entry point
//!
//! This is the command-line interface for checking URLs against robots.txt.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumi_robots::config::load_config;
use sumi_robots::RobotsClient;
use tracing_subscriber::EnvFilter;

/// Sumi-Robots: a robots.txt access gate
///
/// Checks whether a crawler may fetch URLs, and shows the extension
/// directives and sitemaps a site declares for it.
#[derive(Parser, Debug)]
#[command(name = "sumi-robots")]
#[command(version = "1.0.0")]
#[command(about = "A robots.txt access gate", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", conflicts_with = "agent")]
    config: Option<PathBuf>,

    /// User agent to check for (used when no config file is given)
    #[arg(short, long, default_value = "SumiRobots")]
    agent: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print whether each URL may be fetched
    Check {
        /// URLs to check
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },

    /// Print the extension directives (e.g. crawl-delay) for a URL's site
    Options {
        /// Any URL on the site
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Print the sitemaps declared by a URL's site
    Sitemaps {
        /// Any URL on the site
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let robots = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            RobotsClient::from_config(&config)?
        }
        None => RobotsClient::new(cli.agent.clone())?,
    };
    tracing::debug!("Checking as user agent: {}", robots.user_agent());

    match cli.command {
        Command::Check { urls } => handle_check(&robots, &urls).await,
        Command::Options { url } => handle_options(&robots, &url).await,
        Command::Sitemaps { url } => handle_sitemaps(&robots, &url).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_robots=warn"),
            1 => EnvFilter::new("sumi_robots=info,warn"),
            2 => EnvFilter::new("sumi_robots=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `check`: one line per URL, non-zero exit if any URL failed
async fn handle_check(robots: &RobotsClient, urls: &[String]) -> Result<()> {
    let mut failures = 0;

    for url in urls {
        match robots.allowed(url).await {
            Ok(true) => println!("allowed     {}", url),
            Ok(false) => println!("disallowed  {}", url),
            Err(e) => {
                failures += 1;
                println!("error       {} ({})", url, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} URL(s) could not be checked", failures, urls.len());
    }
    Ok(())
}

/// Handles `options`: prints `key: value` lines sorted by key
async fn handle_options(robots: &RobotsClient, url: &str) -> Result<()> {
    let options = robots
        .options(url)
        .await
        .with_context(|| format!("Failed to read robots.txt options for {}", url))?;

    let mut entries: Vec<_> = options.into_iter().collect();
    entries.sort();
    for (key, value) in entries {
        println!("{}: {}", key, value);
    }
    Ok(())
}

/// Handles `sitemaps`: prints one sitemap URL per line
async fn handle_sitemaps(robots: &RobotsClient, url: &str) -> Result<()> {
    let sitemaps = robots
        .sitemaps(url)
        .await
        .with_context(|| format!("Failed to read sitemaps for {}", url))?;

    for sitemap in sitemaps {
        println!("{}", sitemap);
    }
    Ok(())
}

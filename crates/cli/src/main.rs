//! # Strava Merge CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - Activity listing and OAuth URL helpers
//! - The merge command

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_auth_url, run_list, run_merge, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "strava-merge starting");

    let result = match &cli.command {
        Commands::Merge(args) => run_merge(args).await,
        Commands::List(args) => run_list(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::AuthUrl(args) => run_auth_url(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let config = ObservabilityConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_format(cli.log_format.into())
        .with_metrics_port(cli.metrics_port);

    observability::init_with_config(config)
}

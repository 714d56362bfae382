//! FairShare command-line tool
//!
//! Works on a JSON group snapshot: records expenses, reports balances and
//! suggests settle-up transfers.

mod cli;
mod commands;
mod snapshot;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fairshare_shared::AppConfig;
use fairshare_shared::config::LogConfig;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    init_tracing(&config.log);

    match cli.command {
        Command::Allocate(args) => commands::allocate(&cli.snapshot, args, &config),
        Command::Report(args) => commands::report(&cli.snapshot, &args, &config).await,
        Command::Settle(args) => commands::settle(&cli.snapshot, &args, &config),
        Command::Pay(args) => commands::pay(&cli.snapshot, &args),
        Command::Remove(args) => commands::remove(&cli.snapshot, &args),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;

use xeship_core::config::load_dotenv;
use xeship_core::LedgerConfig;
use xeship_ledger::LedgerStore;

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let config = LedgerConfig::from_env_with_base(args.base_dir.clone())
        .context("failed to resolve ledger directory")?;
    config.log_summary();

    let store = LedgerStore::from_config(&config);

    match args.command {
        Command::Migrate { sources } => commands::migrate(&store, &sources),
        Command::Check { sources } => commands::check(&store, &sources),
        Command::Inspect { key, json } => commands::inspect(&store, &key.to_key(), json),
        Command::Compact { key } => commands::compact(&store, &key.to_key()),
    }
}

use anyhow::Context;
use clap::Parser;
use colored::*;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::Cli;
use schemashift::{Config, MigrationError};

fn init_tracing(debug: bool) {
    let default_level = if debug { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    if cli.debug {
        eprintln!("{} {:?}", "DEBUG:".yellow(), cli);
    }

    commands::dispatch(&cli, &config).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        if let Some(MigrationError::UserCancelled) = e.downcast_ref::<MigrationError>() {
            eprintln!("{}", "[X] User cancelled.".yellow());
        } else {
            eprintln!("{} {:#}", "[X]".red().bold(), e);
        }
        std::process::exit(1);
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! planrun: execute installation plans with durable, resumable state.

mod commands;
mod config;
mod halt;
mod output;
mod prompt;

use clap::{Parser, Subcommand};
use halt::Halt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "planrun",
    version,
    about = "Plan execution and recovery for server installs"
)]
struct Cli {
    /// Config file (default: <config dir>/planrun/planrun.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute an installation plan
    Run(commands::run::RunArgs),
    /// Inspect execution sessions
    Session(commands::session::SessionArgs),
    /// Create, list, restore, and delete backups
    Backup(commands::backup::BackupArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli).await {
        match err.downcast_ref::<Halt>() {
            Some(halt) => {
                eprintln!("{halt}");
                std::process::exit(halt.exit_code());
            }
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Run(args) => commands::run::handle(args, &config).await,
        Command::Session(args) => commands::session::handle(args, &config),
        Command::Backup(args) => commands::backup::handle(args, &config).await,
    }
}

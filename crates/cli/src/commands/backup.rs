// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `planrun backup` - Backup and rollback commands

use crate::config::Config;
use crate::halt::Halt;
use crate::output::{format_timestamp, OutputFormat};
use crate::prompt::TerminalPrompt;
use anyhow::Result;
use clap::{Args, Subcommand};
use pr_core::{BackupId, SystemClock};
use pr_engine::ConfirmPrompt;
use pr_rollback::{RollbackConfig, RollbackManager};
use pr_storage::Store;

#[derive(Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
    #[arg(long, value_enum, default_value_t, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Snapshot config and data for the named services
    Create {
        /// Services to snapshot
        #[arg(long, value_delimiter = ',', required = true)]
        services: Vec<String>,
        #[arg(long, default_value = "manual backup")]
        description: String,
    },
    /// List backup points, newest first
    List,
    /// Restore a backup point
    Rollback {
        /// Backup ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete a backup point and its files
    Delete {
        /// Backup ID
        id: String,
    },
}

fn manager(config: &Config) -> Result<RollbackManager<SystemClock>> {
    let store = Store::open(config.ledger_path())?;
    Ok(RollbackManager::new(
        store,
        RollbackConfig {
            backup_dir: config.backups_path(),
            config_path: config.config_snapshot.clone(),
        },
        config.service_specs(),
        SystemClock,
    ))
}

pub async fn handle(args: BackupArgs, config: &Config) -> Result<()> {
    let manager = manager(config)?;
    match args.command {
        BackupCommand::Create {
            services,
            description,
        } => {
            let backup_id = manager.create_backup(&services, &description).await?;
            println!("Created backup {backup_id}");
            Ok(())
        }
        BackupCommand::List => list(&manager, args.format),
        BackupCommand::Rollback { id, yes } => rollback(&manager, &id, yes).await,
        BackupCommand::Delete { id } => {
            manager.delete_backup(&BackupId::from(id.as_str()))?;
            println!("Deleted backup {id}");
            Ok(())
        }
    }
}

fn list(manager: &RollbackManager<SystemClock>, format: OutputFormat) -> Result<()> {
    let backups = manager.list_backups();
    match format {
        OutputFormat::Text => {
            if backups.is_empty() {
                println!("No backups");
                return Ok(());
            }
            println!("{:<24} {:<20} SERVICES", "BACKUP", "CREATED");
            for backup in backups {
                println!(
                    "{:<24} {:<20} {}  {}",
                    backup.backup_id.as_str(),
                    format_timestamp(&backup.timestamp),
                    backup.services.join(","),
                    backup.description
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&backups)?);
        }
    }
    Ok(())
}

async fn rollback(manager: &RollbackManager<SystemClock>, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let prompt = format!(
            "Roll back to {id}? This stops the affected services and overwrites their data."
        );
        if !TerminalPrompt.confirm(&prompt) {
            println!("Cancelled");
            return Ok(());
        }
    }

    let report = manager.rollback(&BackupId::from(id)).await?;
    println!(
        "Restored {} service(s) from {}",
        report.restored_count, report.backup_id
    );
    if !report.success {
        return Err(Halt::RollbackIncomplete(report.failed_services.join(", ")).into());
    }
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `planrun session` - Session inspection commands

use crate::config::Config;
use crate::halt::Halt;
use crate::output::{format_duration_ms, format_timestamp, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use pr_core::SessionId;
use pr_storage::Store;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
    #[arg(long, value_enum, default_value_t, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List all sessions
    List,
    /// Show one session with its step history
    Show {
        /// Session ID
        id: String,
    },
}

pub fn handle(args: SessionArgs, config: &Config) -> Result<()> {
    let store = Store::open(config.ledger_path())?;
    match args.command {
        SessionCommand::List => list(&store, args.format),
        SessionCommand::Show { id } => show(&store, &id, args.format),
    }
}

fn list(store: &Store, format: OutputFormat) -> Result<()> {
    let sessions = store.sessions();
    match format {
        OutputFormat::Text => {
            if sessions.is_empty() {
                println!("No sessions");
                return Ok(());
            }
            let id_width = sessions
                .iter()
                .map(|s| s.id.as_str().len())
                .max()
                .unwrap_or(0)
                .max("SESSION".len());
            println!("{:<id_width$} {:<12} {:>5}  UPDATED", "SESSION", "STATUS", "STEPS");
            for session in sessions {
                println!(
                    "{:<id_width$} {:<12} {:>2}/{:<2}  {}",
                    session.id.as_str(),
                    session.status.to_string(),
                    session.current_step,
                    session.plan.steps.len(),
                    format_timestamp(&session.updated_at)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}

fn show(store: &Store, id: &str, format: OutputFormat) -> Result<()> {
    let session_id = SessionId::from(id);
    let Some(session) = store.session(&session_id) else {
        return Err(Halt::UnknownSession(id.to_string()).into());
    };
    let records = store.step_records(&session_id);

    match format {
        OutputFormat::Text => {
            println!("Session:  {}", session.id);
            println!("Plan:     {}", session.plan.title);
            println!("Status:   {}", session.status);
            println!("Created:  {}", format_timestamp(&session.created_at));
            println!("Updated:  {}", format_timestamp(&session.updated_at));
            if records.is_empty() {
                println!("No step attempts recorded");
                return Ok(());
            }
            println!();
            println!("{:>4}  {:<10} {:>4}  {:>8}  NAME", "STEP", "STATUS", "RC", "TIME");
            for record in records {
                println!(
                    "{:>4}  {:<10} {:>4}  {:>8}  {}",
                    record.step_number,
                    record.status.to_string(),
                    record.result.returncode,
                    format_duration_ms(record.result.duration_ms),
                    record.step_name
                );
            }
        }
        OutputFormat::Json => {
            let combined = serde_json::json!({
                "session": session,
                "step_records": records,
            });
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
    }
    Ok(())
}

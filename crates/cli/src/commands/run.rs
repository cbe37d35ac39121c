// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `planrun run` - Execute an installation plan

use crate::config::Config;
use crate::halt::Halt;
use crate::output::{format_duration_ms, OutputFormat};
use crate::prompt::TerminalPrompt;
use anyhow::{Context, Result};
use clap::Args;
use pr_core::{Plan, SessionId, StepStatus, SystemClock};
use pr_engine::{AutoApprove, ConfirmPrompt, Engine, EngineConfig, PlanRunReport};
use pr_recovery::{Analyzer, HttpClassifier};
use pr_resilience::BreakerRegistry;
use pr_rollback::{RollbackConfig, RollbackManager};
use pr_storage::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct RunArgs {
    /// Plan file (JSON)
    pub plan: PathBuf,
    /// Session id; defaults to the plan file stem
    #[arg(long)]
    pub session: Option<String>,
    /// Hardware snapshot (JSON file) recorded with the session
    #[arg(long, value_name = "PATH")]
    pub hardware: Option<PathBuf>,
    /// Requirements snapshot (JSON file) recorded with the session
    #[arg(long, value_name = "PATH")]
    pub requirements: Option<PathBuf>,
    /// Validate and record steps without executing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Approve privileged steps without prompting
    #[arg(long, short = 'y')]
    pub yes: bool,
    /// Skip steps numbered below N (completed steps are always skipped)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub resume_from: u32,
    /// Per-command timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Services snapshotted before high-risk steps
    #[arg(long, value_delimiter = ',')]
    pub services: Vec<String>,
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub async fn handle(args: RunArgs, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(&args.plan)
        .with_context(|| format!("reading plan {}", args.plan.display()))?;
    let plan: Plan = serde_json::from_str(&text)
        .with_context(|| format!("parsing plan {}", args.plan.display()))?;

    let session = match &args.session {
        Some(id) => id.clone(),
        None => args
            .plan
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string()),
    };

    let store = Store::open(config.ledger_path())?;
    let mut breakers = BreakerRegistry::new(SystemClock);
    let breaker = breakers.register("classifier", config.breaker_config());
    let analyzer = match config.classifier_config() {
        Some(classifier) => {
            Analyzer::with_classifier(Arc::new(HttpClassifier::new(classifier)), breaker)
        }
        None => Analyzer::new(breaker),
    };
    let confirm: Arc<dyn ConfirmPrompt> = if args.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(TerminalPrompt)
    };
    let rollback = RollbackManager::new(
        store.clone(),
        RollbackConfig {
            backup_dir: config.backups_path(),
            config_path: config.config_snapshot.clone(),
        },
        config.service_specs(),
        SystemClock,
    );

    let engine_config = EngineConfig {
        dry_run: args.dry_run,
        auto_approve: args.yes,
        step_timeout: args.timeout.map(Duration::from_secs),
        resume_from: args.resume_from,
        backup_services: args.services.clone(),
    };
    let engine = Engine::new(store, analyzer, confirm, engine_config, SystemClock)
        .with_rollback(Arc::new(rollback));

    let hardware = read_json_arg(args.hardware.as_deref())?;
    let requirements = read_json_arg(args.requirements.as_deref())?;

    let report = engine
        .run_plan(SessionId::from(session.as_str()), hardware, requirements, plan)
        .await?;

    match args.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.completed {
        let at = report
            .outcomes
            .last()
            .map(|o| o.step_number)
            .unwrap_or_default();
        return Err(Halt::PlanHalted(at).into());
    }
    Ok(())
}

fn read_json_arg(path: Option<&Path>) -> Result<serde_json::Value> {
    let Some(path) = path else {
        return Ok(serde_json::Value::Null);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_report(report: &PlanRunReport) {
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            StepStatus::Completed => "ok",
            StepStatus::Failed => "FAILED",
            StepStatus::Cancelled => "cancelled",
        };
        println!(
            "step {:>3}  {:<10} {} ({})",
            outcome.step_number,
            mark,
            outcome.step_name,
            format_duration_ms(outcome.result.duration_ms)
        );
        if let Some(diagnosis) = &outcome.diagnosis {
            println!("          analysis: {}", diagnosis.analysis);
            println!("          suggested fix: {}", diagnosis.suggested_fix);
            if let Some(fix) = &diagnosis.fix_command {
                println!("          fix command: {fix}");
            }
        }
    }
    if report.completed {
        println!("Session {} completed", report.session_id);
    } else {
        println!("Session {} failed", report.session_id);
    }
}

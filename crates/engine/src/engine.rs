// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential plan execution with durable progress.
//!
//! Every step attempt is appended to the store before the engine moves on,
//! so a crashed or interrupted run resumes by skipping exactly the steps
//! that already have a completed attempt. Process failures are data here;
//! [`EngineError`] is reserved for plan and ledger problems.

use crate::confirm::ConfirmPrompt;
use crate::runner::{clamp_timeout, Runner};
use crate::validate::validate_command;
use pr_core::{
    Clock, CommandLine, Diagnosis, ExecutionResult, Plan, PlanError, PlanStep, SessionId,
    StepStatus,
};
use pr_recovery::{AnalyzeRequest, Analyzer};
use pr_rollback::RollbackManager;
use pr_storage::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Ceiling for an automatically-applied fix command.
const FIX_TIMEOUT: Duration = Duration::from_secs(60);
/// Ceiling for a post-step verification command.
const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid plan: {0}")]
    Plan(#[from] PlanError),
}

/// Per-run knobs. Everything is explicit; there is no ambient configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Validate and record steps without spawning anything.
    pub dry_run: bool,
    /// Skip the confirmation prompt on sudo steps.
    pub auto_approve: bool,
    /// Per-command timeout. Out-of-range values fall back to the default.
    pub step_timeout: Option<Duration>,
    /// Skip steps numbered below this, in addition to completed ones.
    pub resume_from: u32,
    /// Services snapshotted before a high-risk step runs.
    pub backup_services: Vec<String>,
}

/// What happened to one step in this run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepOutcome {
    pub step_number: u32,
    pub step_name: String,
    pub status: StepStatus,
    pub result: ExecutionResult,
    pub diagnosis: Option<Diagnosis>,
}

/// Summary of one `run_plan` call.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlanRunReport {
    pub session_id: SessionId,
    pub completed: bool,
    /// Outcomes for the steps this run actually attempted, in order.
    pub outcomes: Vec<StepOutcome>,
}

/// Executes plans step by step.
pub struct Engine<C: Clock> {
    store: Store,
    runner: Runner<C>,
    analyzer: Analyzer<C>,
    rollback: Option<Arc<RollbackManager<C>>>,
    confirm: Arc<dyn ConfirmPrompt>,
    config: EngineConfig,
    clock: C,
}

impl<C: Clock> Engine<C> {
    pub fn new(
        store: Store,
        analyzer: Analyzer<C>,
        confirm: Arc<dyn ConfirmPrompt>,
        config: EngineConfig,
        clock: C,
    ) -> Self {
        Self {
            store,
            runner: Runner::new(clock.clone()),
            analyzer,
            rollback: None,
            confirm,
            config,
            clock,
        }
    }

    /// Enable automatic pre-step backups for high-risk steps.
    pub fn with_rollback(mut self, rollback: Arc<RollbackManager<C>>) -> Self {
        self.rollback = Some(rollback);
        self
    }

    /// Run a plan under the given session id, resuming where a previous
    /// run of the same session left off. Stops at the first step that does
    /// not complete.
    pub async fn run_plan(
        &self,
        session_id: SessionId,
        hardware: serde_json::Value,
        requirements: serde_json::Value,
        plan: Plan,
    ) -> Result<PlanRunReport, EngineError> {
        plan.validate()?;
        self.store.create_session(
            session_id.clone(),
            hardware,
            requirements,
            plan.clone(),
            self.clock.utc_now(),
        )?;
        let already_done = self.store.completed_steps(&session_id);

        tracing::info!(
            session = %session_id,
            title = %plan.title,
            steps = plan.steps.len(),
            skipping = already_done.len(),
            dry_run = self.config.dry_run,
            "starting plan run"
        );

        let mut outcomes = Vec::new();
        for step in &plan.steps {
            if already_done.contains(&step.step_number) {
                tracing::info!(step = step.step_number, name = %step.name, "already completed, skipping");
                continue;
            }
            if step.step_number < self.config.resume_from {
                tracing::info!(step = step.step_number, name = %step.name, "below resume point, skipping");
                continue;
            }

            let outcome = self.execute_step(&session_id, step).await?;
            let halted = outcome.status != StepStatus::Completed;
            outcomes.push(outcome);
            if halted {
                tracing::error!(
                    session = %session_id,
                    step = step.step_number,
                    "step did not complete, halting plan"
                );
                self.store
                    .complete_session(&session_id, false, self.clock.utc_now())?;
                return Ok(PlanRunReport {
                    session_id,
                    completed: false,
                    outcomes,
                });
            }
        }

        self.store
            .complete_session(&session_id, true, self.clock.utc_now())?;
        tracing::info!(session = %session_id, "plan run completed");
        Ok(PlanRunReport {
            session_id,
            completed: true,
            outcomes,
        })
    }

    async fn execute_step(
        &self,
        session_id: &SessionId,
        step: &PlanStep,
    ) -> Result<StepOutcome, EngineError> {
        tracing::info!(step = step.step_number, name = %step.name, "executing step");

        if step.high_risk && !self.config.dry_run {
            if let Some(rollback) = &self.rollback {
                let description = format!("Before step {}: {}", step.step_number, step.name);
                match rollback
                    .create_backup(&self.config.backup_services, &description)
                    .await
                {
                    Ok(backup_id) => {
                        tracing::info!(step = step.step_number, backup = %backup_id, "pre-step backup created");
                    }
                    Err(err) => {
                        // The step still runs; the backup is a safety net,
                        // not a precondition.
                        tracing::warn!(step = step.step_number, error = %err, "pre-step backup failed");
                    }
                }
            }
        }

        let commands = step.command_lines();
        if commands.is_empty() {
            let result = ExecutionResult::synthetic("No commands to execute", self.clock.utc_now());
            return self.finish(session_id, step, StepStatus::Completed, result, None);
        }

        if step.requires_sudo && !self.config.auto_approve {
            let prompt = format!(
                "Step {} ({}) requires elevated privileges. Continue?",
                step.step_number, step.name
            );
            if !self.confirm.confirm(&prompt) {
                tracing::warn!(step = step.step_number, "declined by user");
                let result =
                    ExecutionResult::not_run("User cancelled", 0, self.clock.utc_now());
                return self.finish(session_id, step, StepStatus::Cancelled, result, None);
            }
        }

        let timeout = clamp_timeout(self.config.step_timeout);
        let mut last_result = None;
        for command in commands {
            if let Err(err) = validate_command(command) {
                let result = ExecutionResult::not_run(
                    format!("Validation failed: {err}"),
                    0,
                    self.clock.utc_now(),
                );
                self.record(session_id, step, StepStatus::Failed, result.clone())?;
                let diagnosis = self.analyze(session_id, step, command, &result).await;
                return Ok(StepOutcome {
                    step_number: step.step_number,
                    step_name: step.name.clone(),
                    status: StepStatus::Failed,
                    result,
                    diagnosis: Some(diagnosis),
                });
            }

            let result = self.run_command(command, timeout).await;
            if result.success {
                last_result = Some(result);
                continue;
            }

            self.record(session_id, step, StepStatus::Failed, result.clone())?;
            let diagnosis = self.analyze(session_id, step, command, &result).await;

            if diagnosis.auto_fixable() && !self.config.dry_run {
                if let Some(retried) = self.attempt_fix(step, &diagnosis, command, timeout).await {
                    if retried.success {
                        last_result = Some(retried);
                        continue;
                    }
                    self.record(session_id, step, StepStatus::Failed, retried.clone())?;
                    return Ok(StepOutcome {
                        step_number: step.step_number,
                        step_name: step.name.clone(),
                        status: StepStatus::Failed,
                        result: retried,
                        diagnosis: Some(diagnosis),
                    });
                }
            }

            return Ok(StepOutcome {
                step_number: step.step_number,
                step_name: step.name.clone(),
                status: StepStatus::Failed,
                result,
                diagnosis: Some(diagnosis),
            });
        }

        if !self.config.dry_run {
            if let Some(check) = &step.check_command {
                let check_result = self.runner.run(check, CHECK_TIMEOUT).await;
                if !check_result.success {
                    // Advisory only: the step's own commands succeeded.
                    tracing::warn!(
                        step = step.step_number,
                        check = %check,
                        returncode = check_result.returncode,
                        "verification command failed"
                    );
                }
            }
        }

        let result = match last_result {
            Some(result) => result,
            None => ExecutionResult::synthetic("No commands to execute", self.clock.utc_now()),
        };
        self.finish(session_id, step, StepStatus::Completed, result, None)
    }

    async fn run_command(&self, command: &CommandLine, timeout: Duration) -> ExecutionResult {
        if self.config.dry_run {
            return ExecutionResult::synthetic(
                format!("[dry run] {command}"),
                self.clock.utc_now(),
            );
        }
        self.runner.run(command, timeout).await
    }

    /// Run the diagnosed fix and, if it succeeds, re-execute the failed
    /// command once. Returns None when the fix itself failed.
    async fn attempt_fix(
        &self,
        step: &PlanStep,
        diagnosis: &Diagnosis,
        command: &CommandLine,
        timeout: Duration,
    ) -> Option<ExecutionResult> {
        let fix = diagnosis.fix_command.as_ref()?;
        if validate_command(fix).is_err() {
            tracing::warn!(step = step.step_number, fix = %fix, "fix command rejected by validation");
            return None;
        }

        tracing::info!(step = step.step_number, fix = %fix, "attempting automatic fix");
        let fix_result = self.runner.run(fix, FIX_TIMEOUT).await;
        if !fix_result.success {
            tracing::warn!(
                step = step.step_number,
                returncode = fix_result.returncode,
                "fix command failed"
            );
            return None;
        }

        tracing::info!(step = step.step_number, "fix succeeded, re-executing command");
        Some(self.runner.run(command, timeout).await)
    }

    async fn analyze(
        &self,
        session_id: &SessionId,
        step: &PlanStep,
        command: &CommandLine,
        result: &ExecutionResult,
    ) -> Diagnosis {
        let request = AnalyzeRequest {
            command: command.rendered(),
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            context: serde_json::json!({
                "session_id": session_id.as_str(),
                "step_number": step.step_number,
                "step_name": step.name,
                "error_hint": step.error_hint,
            }),
        };
        let diagnosis = self.analyzer.analyze(request).await;
        tracing::info!(
            step = step.step_number,
            severity = ?diagnosis.severity,
            fix_type = ?diagnosis.fix_type,
            "failure diagnosed"
        );
        diagnosis
    }

    fn record(
        &self,
        session_id: &SessionId,
        step: &PlanStep,
        status: StepStatus,
        result: ExecutionResult,
    ) -> Result<(), EngineError> {
        self.store.record_step(
            session_id,
            step.step_number,
            &step.name,
            status,
            result,
            self.clock.utc_now(),
        )?;
        Ok(())
    }

    fn finish(
        &self,
        session_id: &SessionId,
        step: &PlanStep,
        status: StepStatus,
        result: ExecutionResult,
        diagnosis: Option<Diagnosis>,
    ) -> Result<StepOutcome, EngineError> {
        self.record(session_id, step, status, result.clone())?;
        Ok(StepOutcome {
            step_number: step.step_number,
            step_name: step.name.clone(),
            status,
            result,
            diagnosis,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

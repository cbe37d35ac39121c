// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installation plan model.
//!
//! Plans are authored externally (template- or AI-generated) and consumed
//! here as data. `step_number` defines execution order and is the key the
//! resume logic works in terms of.

use crate::CommandLine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One shell-level step of an installation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_number: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Single command form. Mutually exclusive with `commands`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandLine>,
    /// Multi-command form, executed in order. Mutually exclusive with `command`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandLine>,
    #[serde(default)]
    pub requires_sudo: bool,
    /// Post-execution verification; its failure is advisory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_command: Option<CommandLine>,
    /// Advisory undo command. Never invoked automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_command: Option<CommandLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub error_hint: String,
    /// High-risk steps get an automatic backup before they run.
    #[serde(default)]
    pub high_risk: bool,
}

impl PlanStep {
    /// The commands this step executes, in order. Empty for a no-op step.
    pub fn command_lines(&self) -> Vec<&CommandLine> {
        match &self.command {
            Some(cmd) => vec![cmd],
            None => self.commands.iter().collect(),
        }
    }
}

/// A full installation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    pub steps: Vec<PlanStep>,
    #[serde(default)]
    pub estimated_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_install_notes: Vec<String>,
}

/// Structural problems in an externally-authored plan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("duplicate step number {0}")]
    DuplicateStepNumber(u32),

    #[error("step numbers out of order: {previous} followed by {current}")]
    OutOfOrder { previous: u32, current: u32 },

    #[error("step {0} sets both `command` and `commands`")]
    AmbiguousCommandForm(u32),

    #[error("plan has no steps")]
    Empty,
}

impl Plan {
    /// Check ordering and command-form invariants before execution.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.steps.is_empty() {
            return Err(PlanError::Empty);
        }
        let mut previous: Option<u32> = None;
        for step in &self.steps {
            if let Some(prev) = previous {
                if step.step_number == prev {
                    return Err(PlanError::DuplicateStepNumber(prev));
                }
                if step.step_number < prev {
                    return Err(PlanError::OutOfOrder {
                        previous: prev,
                        current: step.step_number,
                    });
                }
            }
            if step.command.is_some() && !step.commands.is_empty() {
                return Err(PlanError::AmbiguousCommandForm(step.step_number));
            }
            previous = Some(step.step_number);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;

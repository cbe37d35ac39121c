// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution records: results, step attempts, and sessions.

use crate::{Plan, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of running one command. Value type, never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionResult {
    /// Result captured from a finished child process.
    pub fn captured(
        returncode: i32,
        stdout: String,
        stderr: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            success: returncode == 0,
            returncode,
            stdout,
            stderr,
            duration_ms,
            timestamp,
        }
    }

    /// A failure that never produced a process: validation rejection,
    /// spawn failure, timeout, or user cancellation.
    pub fn not_run(stderr: impl Into<String>, duration_ms: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            returncode: -1,
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms,
            timestamp,
        }
    }

    /// Synthetic success for dry runs and no-op steps.
    pub fn synthetic(stdout: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            returncode: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 0,
            timestamp,
        }
    }
}

/// Terminal status of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Failed,
    Cancelled,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One step attempt. Append-only: a retried step produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub session_id: SessionId,
    pub step_number: u32,
    pub step_name: String,
    pub status: StepStatus,
    pub result: ExecutionResult,
    pub recorded_at: DateTime<Utc>,
}

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One execution attempt of a plan.
///
/// The session row is mutable (current_step/status/updated_at); immutable
/// history lives in the step records, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Hardware snapshot, passed through opaquely to the analyzer.
    pub hardware: serde_json::Value,
    /// Requirements snapshot, passed through opaquely to the analyzer.
    pub requirements: serde_json::Value,
    pub plan: Plan,
    pub current_step: u32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

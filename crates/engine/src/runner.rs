// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution.
//!
//! Commands are spawned directly from their argument vector; nothing is
//! ever handed to a shell. Children get hard resource ceilings so a
//! runaway process cannot take the host down with it. Every failure mode
//! (spawn error, timeout, non-zero exit) is captured as a failed
//! [`ExecutionResult`], never surfaced as an error.

use pr_core::{Clock, CommandLine, ExecutionResult};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Address-space ceiling for children: 2 GiB.
const CHILD_MEMORY_LIMIT: u64 = 2 * 1024 * 1024 * 1024;
/// CPU-seconds ceiling for children.
const CHILD_CPU_LIMIT_SECS: u64 = 3600;

/// Resolve the per-command timeout. Any positive duration up to
/// [`MAX_TIMEOUT`] passes through unchanged; absent, zero, or over-ceiling
/// values fall back to the default.
pub fn clamp_timeout(requested: Option<Duration>) -> Duration {
    match requested {
        None => DEFAULT_TIMEOUT,
        Some(timeout) if timeout > Duration::ZERO && timeout <= MAX_TIMEOUT => timeout,
        Some(timeout) => {
            tracing::warn!(
                requested_secs = timeout.as_secs(),
                "timeout out of range, using default"
            );
            DEFAULT_TIMEOUT
        }
    }
}

/// Spawns plan commands and captures their outcome.
#[derive(Clone)]
pub struct Runner<C: Clock> {
    clock: C,
}

impl<C: Clock> Runner<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Run one command to completion, bounded by `timeout`.
    pub async fn run(&self, command: &CommandLine, timeout: Duration) -> ExecutionResult {
        let start = self.clock.now();
        let Some(program) = command.program() else {
            return ExecutionResult::not_run("Empty command", 0, self.clock.utc_now());
        };

        tracing::info!(command = %command, timeout_secs = timeout.as_secs(), "executing");

        let mut process = tokio::process::Command::new(program);
        process
            .args(command.args())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        apply_child_limits(&mut process);

        let child = match process.spawn() {
            Ok(child) => child,
            Err(err) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::error!(command = %command, error = %err, "spawn failed");
                return ExecutionResult::not_run(
                    format!("Failed to spawn {program}: {err}"),
                    duration_ms,
                    self.clock.utc_now(),
                );
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                let returncode = output.status.code().unwrap_or(-1);
                if returncode != 0 {
                    tracing::warn!(command = %command, returncode, "command failed");
                }
                ExecutionResult::captured(
                    returncode,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                    duration_ms,
                    self.clock.utc_now(),
                )
            }
            Ok(Err(err)) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::error!(command = %command, error = %err, "wait failed");
                ExecutionResult::not_run(
                    format!("OS error: {err}"),
                    duration_ms,
                    self.clock.utc_now(),
                )
            }
            Err(_) => {
                // kill_on_drop reaps the child when the future is dropped.
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::error!(command = %command, timeout_secs = timeout.as_secs(), "timed out");
                ExecutionResult::not_run(
                    format!("Command timed out after {}s", timeout.as_secs()),
                    duration_ms,
                    self.clock.utc_now(),
                )
            }
        }
    }
}

/// Set RLIMIT_AS and RLIMIT_CPU on the child between fork and exec.
#[cfg(unix)]
fn apply_child_limits(process: &mut tokio::process::Command) {
    // pre_exec runs in the forked child; setrlimit is async-signal-safe.
    #[allow(unsafe_code)]
    unsafe {
        process.pre_exec(|| {
            use nix::sys::resource::{setrlimit, Resource, RLIM_INFINITY};
            let _ = setrlimit(Resource::RLIMIT_AS, CHILD_MEMORY_LIMIT, RLIM_INFINITY);
            let _ = setrlimit(Resource::RLIMIT_CPU, CHILD_CPU_LIMIT_SECS, RLIM_INFINITY);
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn apply_child_limits(_process: &mut tokio::process::Command) {}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

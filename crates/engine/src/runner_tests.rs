// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pr_core::{CommandLine, SystemClock};
use std::time::Duration;
use yare::parameterized;

#[parameterized(
    absent = { None, DEFAULT_TIMEOUT },
    in_range = { Some(Duration::from_secs(45)), Duration::from_secs(45) },
    sub_second = { Some(Duration::from_millis(100)), Duration::from_millis(100) },
    at_max = { Some(MAX_TIMEOUT), MAX_TIMEOUT },
    zero = { Some(Duration::ZERO), DEFAULT_TIMEOUT },
    over_max = { Some(Duration::from_secs(7200)), DEFAULT_TIMEOUT },
)]
fn clamp_timeout_bounds(requested: Option<Duration>, expected: Duration) {
    assert_eq!(clamp_timeout(requested), expected);
}

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let runner = Runner::new(SystemClock);
    let command = CommandLine::new(["echo", "hello"]);

    let result = runner.run(&command, DEFAULT_TIMEOUT).await;

    assert!(result.success);
    assert_eq!(result.returncode, 0);
    assert_eq!(result.stdout.trim(), "hello");
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn nonzero_exit_is_a_failed_result() {
    let runner = Runner::new(SystemClock);
    let command = CommandLine::new(["sh", "-c", "echo oops >&2; exit 3"]);

    let result = runner.run(&command, DEFAULT_TIMEOUT).await;

    assert!(!result.success);
    assert_eq!(result.returncode, 3);
    assert_eq!(result.stderr.trim(), "oops");
}

#[tokio::test]
async fn missing_program_is_captured_not_raised() {
    let runner = Runner::new(SystemClock);
    let command = CommandLine::new(["definitely-not-a-real-program-xyz"]);

    let result = runner.run(&command, DEFAULT_TIMEOUT).await;

    assert!(!result.success);
    assert_eq!(result.returncode, -1);
    assert!(result.stderr.contains("Failed to spawn"));
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let runner = Runner::new(SystemClock);
    let command = CommandLine::new::<_, &str>([]);

    let result = runner.run(&command, DEFAULT_TIMEOUT).await;

    assert!(!result.success);
    assert_eq!(result.stderr, "Empty command");
}

#[tokio::test]
async fn timeout_kills_the_child() {
    let runner = Runner::new(SystemClock);
    let command = CommandLine::new(["sleep", "30"]);

    let result = runner.run(&command, Duration::from_millis(100)).await;

    assert!(!result.success);
    assert_eq!(result.returncode, -1);
    assert!(result.stderr.contains("timed out"));
}

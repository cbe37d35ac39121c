// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `planrun run`: execution, halting, resume, dry run.

use crate::prelude::*;
use pr_core::{SessionId, SessionStatus, StepStatus};
use serde_json::json;

fn echo_steps() -> serde_json::Value {
    json!({
        "title": "install",
        "steps": [
            {"step_number": 1, "name": "first", "command": ["echo", "one"]},
            {"step_number": 2, "name": "second", "command": ["echo", "two"]},
        ]
    })
}

#[test]
#[serial]
fn plan_runs_to_completion() {
    let project = Project::new();
    let plan = project.plan("install.json", &echo_steps());

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "s1", "--yes"])
        .passes()
        .stdout_has("first")
        .stdout_has("second")
        .stdout_has("Session s1 completed");

    let store = project.store();
    let session = store.session(&SessionId::from("s1")).unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(store.step_records(&SessionId::from("s1")).len(), 2);
}

#[test]
#[serial]
fn failing_step_halts_with_a_diagnosis() {
    let project = Project::new();
    let marker = project.path("step3-ran");
    let plan = project.plan(
        "install.json",
        &json!({
            "title": "install",
            "steps": [
                {"step_number": 1, "name": "first", "command": ["echo", "one"]},
                {"step_number": 2, "name": "start service", "command":
                    ["sh", "-c", "echo 'Error: port is already allocated' >&2; exit 1"]},
                {"step_number": 3, "name": "after", "command":
                    ["touch", marker.display().to_string()]},
            ]
        }),
    );

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "s1", "--yes", "--format", "json"])
        .fails()
        .stdout_has("\"fix_type\": \"modify_command\"")
        .stderr_has("plan halted at step 2");

    assert!(!marker.exists());

    let store = project.store();
    let id = SessionId::from("s1");
    assert_eq!(store.session(&id).unwrap().status, SessionStatus::Failed);
    let records = store.step_records(&id);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, StepStatus::Failed);
}

#[test]
#[serial]
fn rerun_skips_already_completed_steps() {
    let project = Project::new();
    let failing = json!({
        "title": "install",
        "steps": [
            {"step_number": 1, "name": "first", "command": ["echo", "one"]},
            {"step_number": 2, "name": "second", "command": ["false"]},
        ]
    });
    let plan = project.plan("install.json", &failing);

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "s1", "--yes"])
        .fails();

    // Fix the plan and rerun the same session: step 1 must not run again.
    project.plan("install.json", &echo_steps());
    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "s1", "--yes"])
        .passes()
        .stdout_lacks("first")
        .stdout_has("second")
        .stdout_has("Session s1 completed");
}

#[test]
#[serial]
fn dry_run_spawns_nothing() {
    let project = Project::new();
    let plan = project.plan(
        "install.json",
        &json!({
            "steps": [
                {"step_number": 1, "name": "bogus", "command": ["no-such-program-xyz"]},
            ]
        }),
    );

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "dry", "--yes", "--dry-run", "--format", "json"])
        .passes()
        .stdout_has("[dry run]");
}

#[test]
#[serial]
fn dangerous_command_is_rejected_without_running() {
    let project = Project::new();
    let plan = project.plan(
        "install.json",
        &json!({
            "steps": [
                {"step_number": 1, "name": "wipe", "command":
                    ["sh", "-c", "rm -rf / --no-preserve-root"]},
            ]
        }),
    );

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "danger", "--yes", "--format", "json"])
        .fails()
        .stdout_has("Validation failed");
}

#[test]
#[serial]
fn missing_plan_file_is_an_error() {
    let project = Project::new();
    project
        .planrun()
        .args(&["run", "nope.json", "--yes"])
        .fails()
        .stderr_has("reading plan");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `planrun session`: listing and inspection.

use crate::prelude::*;
use serde_json::json;

#[test]
#[serial]
fn completed_session_shows_in_list_and_detail() {
    let project = Project::new();
    let plan = project.plan(
        "install.json",
        &json!({
            "title": "install",
            "steps": [
                {"step_number": 1, "name": "first", "command": ["echo", "one"]},
            ]
        }),
    );

    project
        .planrun()
        .args(&["run"])
        .arg_path(&plan)
        .args(&["--session", "s1", "--yes"])
        .passes();

    project
        .planrun()
        .args(&["session", "list"])
        .passes()
        .stdout_has("s1")
        .stdout_has("completed");

    project
        .planrun()
        .args(&["session", "show", "s1"])
        .passes()
        .stdout_has("s1")
        .stdout_has("first");
}

#[test]
#[serial]
fn unknown_session_halts_without_an_error_prefix() {
    let project = Project::new();
    project
        .planrun()
        .args(&["session", "show", "nope"])
        .fails()
        .stderr_has("Session nope not found")
        .stderr_lacks("Error:");
}

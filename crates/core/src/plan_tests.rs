// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn step(n: u32, name: &str) -> PlanStep {
    PlanStep {
        step_number: n,
        name: name.to_string(),
        description: String::new(),
        command: Some(CommandLine::new(["echo", name])),
        commands: Vec::new(),
        requires_sudo: false,
        check_command: None,
        rollback_command: None,
        expected_output: None,
        error_hint: String::new(),
        high_risk: false,
    }
}

fn plan(steps: Vec<PlanStep>) -> Plan {
    Plan {
        title: "test".to_string(),
        description: String::new(),
        prerequisites: Vec::new(),
        steps,
        estimated_time_minutes: 0,
        known_issues: Vec::new(),
        post_install_notes: Vec::new(),
    }
}

#[test]
fn validate_accepts_ascending_steps() {
    let p = plan(vec![step(1, "a"), step(2, "b"), step(5, "c")]);
    assert!(p.validate().is_ok());
}

#[test]
fn validate_rejects_empty_plan() {
    assert_eq!(plan(vec![]).validate(), Err(PlanError::Empty));
}

#[test]
fn validate_rejects_duplicates() {
    let p = plan(vec![step(1, "a"), step(1, "b")]);
    assert_eq!(p.validate(), Err(PlanError::DuplicateStepNumber(1)));
}

#[test]
fn validate_rejects_out_of_order() {
    let p = plan(vec![step(3, "a"), step(2, "b")]);
    assert_eq!(
        p.validate(),
        Err(PlanError::OutOfOrder { previous: 3, current: 2 })
    );
}

#[test]
fn validate_rejects_both_command_forms() {
    let mut s = step(1, "a");
    s.commands = vec![CommandLine::new(["true"])];
    let p = plan(vec![s]);
    assert_eq!(p.validate(), Err(PlanError::AmbiguousCommandForm(1)));
}

#[test]
fn command_lines_prefers_single_form() {
    let s = step(1, "a");
    assert_eq!(s.command_lines().len(), 1);
}

#[test]
fn command_lines_uses_multi_form_in_order() {
    let mut s = step(1, "a");
    s.command = None;
    s.commands = vec![CommandLine::new(["first"]), CommandLine::new(["second"])];
    let cmds: Vec<String> = s.command_lines().iter().map(|c| c.rendered()).collect();
    assert_eq!(cmds, ["first", "second"]);
}

#[test]
fn plan_deserializes_with_defaults() {
    let json = r#"{
        "steps": [
            {"step_number": 1, "name": "Install", "command": ["apt", "install", "-y", "jq"]}
        ]
    }"#;
    let p: Plan = serde_json::from_str(json).unwrap();
    assert!(p.title.is_empty());
    assert!(!p.steps[0].requires_sudo);
    assert!(!p.steps[0].high_risk);
    assert!(p.validate().is_ok());
}

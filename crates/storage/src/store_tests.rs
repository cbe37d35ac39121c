// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use pr_core::{CommandLine, PlanStep};
use std::collections::BTreeMap;
use tempfile::tempdir;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

fn plan() -> Plan {
    Plan {
        title: "install".into(),
        description: String::new(),
        prerequisites: vec![],
        steps: vec![
            PlanStep {
                step_number: 1,
                name: "update".into(),
                description: String::new(),
                command: Some(CommandLine::new(["apt-get", "update"])),
                commands: vec![],
                requires_sudo: true,
                check_command: None,
                rollback_command: None,
                expected_output: None,
                error_hint: String::new(),
                high_risk: false,
            },
            PlanStep {
                step_number: 2,
                name: "install docker".into(),
                description: String::new(),
                command: Some(CommandLine::new(["apt-get", "install", "-y", "docker.io"])),
                commands: vec![],
                requires_sudo: true,
                check_command: None,
                rollback_command: None,
                expected_output: None,
                error_hint: String::new(),
                high_risk: false,
            },
        ],
        estimated_time_minutes: 10,
        known_issues: vec![],
        post_install_notes: vec![],
    }
}

fn create(store: &Store, id: &str, secs: i64) -> SessionId {
    store
        .create_session(
            SessionId::new(id),
            serde_json::json!({}),
            serde_json::json!({}),
            plan(),
            at(secs),
        )
        .unwrap()
}

fn backup(id: &str, secs: i64) -> BackupPoint {
    BackupPoint {
        backup_id: id.into(),
        timestamp: at(secs),
        description: "before step 2".into(),
        services: vec!["jellyfin".into()],
        config_snapshot_path: None,
        config_digest: None,
        data_snapshot_paths: BTreeMap::new(),
        container_snapshot_paths: BTreeMap::new(),
    }
}

#[test]
fn create_session_preserves_created_at_on_reopen() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();

    let id = create(&store, "run-1", 100);
    store.complete_session(&id, false, at(150)).unwrap();
    create(&store, "run-1", 200);

    let session = store.session(&id).unwrap();
    assert_eq!(session.created_at, at(100));
    assert_eq!(session.updated_at, at(200));
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[test]
fn record_step_requires_known_session() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();

    let err = store
        .record_step(
            &SessionId::new("ghost"),
            1,
            "update",
            StepStatus::Completed,
            ExecutionResult::synthetic("", at(1)),
            at(1),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownSession(_)));
}

#[test]
fn completed_steps_only_counts_completed_attempts() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();
    let id = create(&store, "run-1", 100);

    store
        .record_step(
            &id,
            1,
            "update",
            StepStatus::Completed,
            ExecutionResult::synthetic("", at(110)),
            at(110),
        )
        .unwrap();
    store
        .record_step(
            &id,
            2,
            "install docker",
            StepStatus::Failed,
            ExecutionResult::not_run("boom", 5, at(120)),
            at(120),
        )
        .unwrap();

    let completed = store.completed_steps(&id);
    assert!(completed.contains(&1));
    assert!(!completed.contains(&2));
    assert_eq!(store.session(&id).unwrap().current_step, 2);
}

#[test]
fn state_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger");

    {
        let store = Store::open(&path).unwrap();
        let id = create(&store, "run-1", 100);
        store
            .record_step(
                &id,
                1,
                "update",
                StepStatus::Completed,
                ExecutionResult::synthetic("", at(110)),
                at(110),
            )
            .unwrap();
        store.record_backup(backup("bkp-a", 120)).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let id = SessionId::new("run-1");
    assert_eq!(store.completed_steps(&id).len(), 1);
    assert_eq!(store.backups().len(), 1);
    assert_eq!(store.step_records(&id).len(), 1);
}

#[test]
fn sessions_sorted_most_recent_first() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();
    create(&store, "old", 100);
    create(&store, "new", 200);

    let sessions = store.sessions();
    assert_eq!(sessions[0].id, "new");
    assert_eq!(sessions[1].id, "old");
}

#[test]
fn backups_sorted_newest_first() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();
    store.record_backup(backup("bkp-a", 100)).unwrap();
    store.record_backup(backup("bkp-b", 200)).unwrap();

    let backups = store.backups();
    assert_eq!(backups[0].backup_id, "bkp-b");
    assert_eq!(backups[1].backup_id, "bkp-a");
}

#[test]
fn delete_backup_returns_point_and_unknown_errors() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();
    store.record_backup(backup("bkp-a", 100)).unwrap();

    let deleted = store.delete_backup(&"bkp-a".into()).unwrap();
    assert_eq!(deleted.backup_id, "bkp-a");
    assert!(store.backup(&"bkp-a".into()).is_none());

    let err = store.delete_backup(&"bkp-a".into()).unwrap_err();
    assert!(matches!(err, StoreError::UnknownBackup(_)));
}

#[test]
fn rollback_log_appends_in_order() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("ledger")).unwrap();

    for (id, ok) in [("bkp-a", false), ("bkp-a", true)] {
        store
            .append_rollback_log(RollbackLogEntry {
                backup_id: id.into(),
                timestamp: at(100),
                success: ok,
                restored_count: u32::from(ok),
                failed_services: if ok { vec![] } else { vec!["jellyfin".into()] },
            })
            .unwrap();
    }

    let log = store.rollback_log();
    assert_eq!(log.len(), 2);
    assert!(!log[0].success);
    assert!(log[1].success);
}

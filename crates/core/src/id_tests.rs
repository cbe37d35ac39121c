// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn backup_id_has_prefix_and_length() {
    let id = BackupId::generate();
    assert!(id.as_str().starts_with(BackupId::PREFIX));
    assert_eq!(id.as_str().len(), BackupId::PREFIX.len() + 19);
}

#[test]
fn backup_ids_are_unique() {
    let a = BackupId::generate();
    let b = BackupId::generate();
    assert_ne!(a, b);
}

#[test]
fn session_id_round_trips_through_serde() {
    let id = SessionId::new("install-2026-01");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"install-2026-01\"");
    let parsed: SessionId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn session_id_compares_with_str() {
    let id = SessionId::new("s1");
    assert_eq!(id, "s1");
    assert!(!id.is_empty());
    assert!(SessionId::new("").is_empty());
}

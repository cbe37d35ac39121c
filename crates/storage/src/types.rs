// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted record types for the backup ledger.

use chrono::{DateTime, Utc};
use pr_core::BackupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An immutable snapshot of configuration and per-service data.
///
/// Created once, never mutated, deleted only by explicit user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPoint {
    pub backup_id: BackupId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_snapshot_path: Option<PathBuf>,
    /// sha256 of the config snapshot, for integrity checks before restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_digest: Option<String>,
    /// service name → snapshot directory.
    #[serde(default)]
    pub data_snapshot_paths: BTreeMap<String, PathBuf>,
    /// service name → exported container tar. Retained for manual import;
    /// restore itself is data-only.
    #[serde(default)]
    pub container_snapshot_paths: BTreeMap<String, PathBuf>,
}

/// Audit row for one rollback attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackLogEntry {
    pub backup_id: BackupId,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub restored_count: u32,
    #[serde(default)]
    pub failed_services: Vec<String>,
}

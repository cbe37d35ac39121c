// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from ledger replay.

use crate::ledger::LedgerRecord;
use crate::types::{BackupPoint, RollbackLogEntry};
use pr_core::{Session, StepRecord};
use std::collections::HashMap;

/// In-memory view of the four logical tables, derived by replaying ledger
/// records in order. Records are facts about what happened; this is what
/// the facts add up to.
#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    /// One row per session, keyed by session id. Mutable fields
    /// (current_step/status/updated_at) are rewritten by later records.
    pub sessions: HashMap<String, Session>,
    /// Append-only, one row per step attempt across all sessions.
    pub step_records: Vec<StepRecord>,
    /// Backup points, keyed by backup id.
    pub backups: HashMap<String, BackupPoint>,
    /// Append-only rollback audit trail.
    pub rollback_log: Vec<RollbackLogEntry>,
}

impl MaterializedState {
    /// Apply one record. Replay calls this once per record, in ledger order.
    pub fn apply(&mut self, record: &LedgerRecord) {
        match record {
            LedgerRecord::SessionCreated { session } => {
                self.sessions
                    .insert(session.id.as_str().to_string(), session.clone());
            }

            LedgerRecord::StepRecorded { record } => {
                if let Some(session) = self.sessions.get_mut(record.session_id.as_str()) {
                    session.current_step = record.step_number;
                    session.updated_at = record.recorded_at;
                }
                self.step_records.push(record.clone());
            }

            LedgerRecord::SessionCompleted {
                session_id,
                status,
                at,
            } => {
                if let Some(session) = self.sessions.get_mut(session_id.as_str()) {
                    session.status = *status;
                    session.updated_at = *at;
                }
            }

            LedgerRecord::BackupCreated { backup } => {
                self.backups
                    .insert(backup.backup_id.as_str().to_string(), backup.clone());
            }

            LedgerRecord::BackupDeleted { backup_id } => {
                self.backups.remove(backup_id.as_str());
            }

            LedgerRecord::RollbackLogged { entry } => {
                self.rollback_log.push(entry.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

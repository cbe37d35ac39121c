// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public store API over the ledger.
//!
//! Single writer per session is assumed; concurrent readers are fine at any
//! time (reads clone out of the mutex-guarded state and never block on I/O).

use crate::ledger::{Ledger, LedgerRecord};
use crate::state::MaterializedState;
use crate::types::{BackupPoint, RollbackLogEntry};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pr_core::{
    BackupId, ExecutionResult, Plan, Session, SessionId, SessionStatus, StepRecord, StepStatus,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the durable store.
///
/// Any error from a write method means the session can no longer make
/// durability guarantees and must be treated as fatal by the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ledger corrupt at byte {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("unknown backup: {0}")]
    UnknownBackup(BackupId),
}

struct Inner {
    ledger: Ledger,
    state: MaterializedState,
}

/// Durable ledger of sessions, step attempts, backup points, and rollback
/// attempts. Cheap to clone; clones share the same underlying ledger.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl Store {
    /// Open the store at `path`, replaying any existing ledger.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let (ledger, state) = Ledger::open(path.as_ref())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { ledger, state })),
        })
    }

    /// Create (or re-open) a session. Idempotent upsert by id: re-creating
    /// an existing session keeps its original `created_at` and resets the
    /// status to in-progress, which is what a resumed run needs.
    pub fn create_session(
        &self,
        id: SessionId,
        hardware: serde_json::Value,
        requirements: serde_json::Value,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<SessionId, StoreError> {
        let mut inner = self.inner.lock();
        let created_at = inner
            .state
            .sessions
            .get(id.as_str())
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        let session = Session {
            id: id.clone(),
            hardware,
            requirements,
            plan,
            current_step: 0,
            status: SessionStatus::InProgress,
            created_at,
            updated_at: now,
        };
        let record = LedgerRecord::SessionCreated { session };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(id)
    }

    /// Append one step attempt and advance the session cursor.
    pub fn record_step(
        &self,
        session_id: &SessionId,
        step_number: u32,
        step_name: &str,
        status: StepStatus,
        result: ExecutionResult,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.state.sessions.contains_key(session_id.as_str()) {
            return Err(StoreError::UnknownSession(session_id.clone()));
        }
        let record = LedgerRecord::StepRecorded {
            record: StepRecord {
                session_id: session_id.clone(),
                step_number,
                step_name: step_name.to_string(),
                status,
                result,
                recorded_at: now,
            },
        };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(())
    }

    /// Step numbers with at least one completed attempt. Exactly these are
    /// skipped on resume.
    pub fn completed_steps(&self, session_id: &SessionId) -> BTreeSet<u32> {
        let inner = self.inner.lock();
        inner
            .state
            .step_records
            .iter()
            .filter(|r| r.session_id == *session_id && r.status == StepStatus::Completed)
            .map(|r| r.step_number)
            .collect()
    }

    /// Mark a session terminal.
    pub fn complete_session(
        &self,
        session_id: &SessionId,
        success: bool,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.state.sessions.contains_key(session_id.as_str()) {
            return Err(StoreError::UnknownSession(session_id.clone()));
        }
        let record = LedgerRecord::SessionCompleted {
            session_id: session_id.clone(),
            status: if success {
                SessionStatus::Completed
            } else {
                SessionStatus::Failed
            },
            at: now,
        };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(())
    }

    pub fn session(&self, id: &SessionId) -> Option<Session> {
        self.inner.lock().state.sessions.get(id.as_str()).cloned()
    }

    /// All sessions, most recently updated first.
    pub fn sessions(&self) -> Vec<Session> {
        let inner = self.inner.lock();
        let mut sessions: Vec<Session> = inner.state.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    /// Step attempts for a session in recorded order.
    pub fn step_records(&self, session_id: &SessionId) -> Vec<StepRecord> {
        let inner = self.inner.lock();
        inner
            .state
            .step_records
            .iter()
            .filter(|r| r.session_id == *session_id)
            .cloned()
            .collect()
    }

    /// Record a new backup point.
    pub fn record_backup(&self, backup: BackupPoint) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let record = LedgerRecord::BackupCreated { backup };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(())
    }

    pub fn backup(&self, id: &BackupId) -> Option<BackupPoint> {
        self.inner.lock().state.backups.get(id.as_str()).cloned()
    }

    /// All backup points, newest first.
    pub fn backups(&self) -> Vec<BackupPoint> {
        let inner = self.inner.lock();
        let mut backups: Vec<BackupPoint> = inner.state.backups.values().cloned().collect();
        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        backups
    }

    /// Drop a backup point from the ledger. The caller removes the files.
    pub fn delete_backup(&self, id: &BackupId) -> Result<BackupPoint, StoreError> {
        let mut inner = self.inner.lock();
        let Some(backup) = inner.state.backups.get(id.as_str()).cloned() else {
            return Err(StoreError::UnknownBackup(id.clone()));
        };
        let record = LedgerRecord::BackupDeleted {
            backup_id: id.clone(),
        };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(backup)
    }

    /// Append to the rollback audit trail. Called for every rollback
    /// attempt regardless of outcome.
    pub fn append_rollback_log(&self, entry: RollbackLogEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let record = LedgerRecord::RollbackLogged { entry };
        inner.ledger.append(&record)?;
        inner.state.apply(&record);
        Ok(())
    }

    pub fn rollback_log(&self) -> Vec<RollbackLogEntry> {
        self.inner.lock().state.rollback_log.clone()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

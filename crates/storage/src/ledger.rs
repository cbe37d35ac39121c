// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSON-lines ledger.
//!
//! One record per line. On open the existing file is replayed in order to
//! rebuild the materialized state. A torn final line (crash mid-write) is
//! dropped and the file truncated back to the last complete record; a
//! corrupt line anywhere else is an error.

use crate::state::MaterializedState;
use crate::types::{BackupPoint, RollbackLogEntry};
use crate::StoreError;
use chrono::{DateTime, Utc};
use pr_core::{BackupId, Session, SessionId, SessionStatus, StepRecord};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// One persisted fact. The ledger is the source of truth; all tables are
/// derived from replaying these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerRecord {
    SessionCreated {
        session: Session,
    },
    StepRecorded {
        record: StepRecord,
    },
    SessionCompleted {
        session_id: SessionId,
        status: SessionStatus,
        at: DateTime<Utc>,
    },
    BackupCreated {
        backup: BackupPoint,
    },
    BackupDeleted {
        backup_id: BackupId,
    },
    RollbackLogged {
        entry: RollbackLogEntry,
    },
}

/// Append-only record log backing the [`crate::Store`].
pub struct Ledger {
    path: PathBuf,
    file: File,
}

impl Ledger {
    /// Open (creating if needed) the ledger at `path`, replaying existing
    /// records into a fresh [`MaterializedState`].
    pub fn open(path: &Path) -> Result<(Self, MaterializedState), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut state = MaterializedState::default();
        let valid_len = match std::fs::metadata(path) {
            Ok(_) => replay(path, &mut state)?,
            Err(_) => 0,
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let ledger = Self {
            path: path.to_path_buf(),
            file,
        };

        // Drop a torn trailing line left by a crash mid-write.
        let on_disk = ledger.file.metadata()?.len();
        if valid_len < on_disk {
            tracing::warn!(
                path = %ledger.path.display(),
                dropped_bytes = on_disk - valid_len,
                "truncating torn ledger tail"
            );
            ledger.file.set_len(valid_len)?;
        }

        Ok((ledger, state))
    }

    /// Append one record, fsyncing before returning.
    ///
    /// A failure here is fatal for the session: without durable state the
    /// resume guarantees are void, so callers must not continue past an Err.
    pub fn append(&mut self, record: &LedgerRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_data()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Replay all complete records into `state`, returning the byte length of
/// the valid prefix.
fn replay(path: &Path, state: &mut MaterializedState) -> Result<u64, StoreError> {
    let mut raw = String::new();
    File::open(path)?.read_to_string(&mut raw)?;

    let mut offset: u64 = 0;
    let mut iter = raw.split_inclusive('\n').peekable();
    while let Some(line) = iter.next() {
        let complete = line.ends_with('\n');
        let trimmed = line.trim_end_matches('\n');
        if trimmed.is_empty() {
            offset += line.len() as u64;
            continue;
        }
        match serde_json::from_str::<LedgerRecord>(trimmed) {
            Ok(record) => {
                state.apply(&record);
                offset += line.len() as u64;
            }
            Err(err) if !complete && iter.peek().is_none() => {
                // Torn tail: stop replay here, caller truncates.
                tracing::warn!(error = %err, offset, "incomplete final ledger line");
                break;
            }
            Err(err) => {
                return Err(StoreError::Corrupt {
                    offset,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(offset)
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;

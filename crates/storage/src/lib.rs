// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-storage: durable ledger of sessions, step attempts, and backups.
//!
//! Persistence is an append-only JSON-lines ledger replayed into an
//! in-memory [`MaterializedState`] on open. Every append is flushed and
//! synced before the call returns, which is the crash-consistency boundary
//! the execution engine relies on: a step is only considered persisted once
//! its ledger record has hit disk.

mod ledger;
mod state;
mod store;
mod types;

pub use ledger::{Ledger, LedgerRecord};
pub use state::MaterializedState;
pub use store::{Store, StoreError};
pub use types::{BackupPoint, RollbackLogEntry};

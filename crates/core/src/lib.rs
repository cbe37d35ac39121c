// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-core: domain types for plan execution and recovery.
//!
//! Value types shared by the storage ledger, the execution engine, the
//! recovery analyzer, and the rollback manager. No I/O lives here.

pub mod clock;
pub mod command;
pub mod diagnosis;
pub mod id;
pub mod plan;
pub mod record;

pub use clock::{Clock, FakeClock, SystemClock};
pub use command::CommandLine;
pub use diagnosis::{truncate_chars, Diagnosis, FixType, Severity};
pub use id::{BackupId, SessionId};
pub use plan::{Plan, PlanError, PlanStep};
pub use record::{ExecutionResult, Session, SessionStatus, StepRecord, StepStatus};

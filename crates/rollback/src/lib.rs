// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-rollback: backup points and best-effort restore.
//!
//! A backup point snapshots the agent config and each service's data
//! directory, plus a `docker export` tar for containerized services.
//! Rollback restores per service and keeps going past individual
//! failures; the outcome of every attempt lands in the store's rollback
//! log. Runs strictly between plan executions, never during one.

mod fsops;
mod manager;
mod service;

pub use fsops::{copy_dir_recursive, sha256_file};
pub use manager::{RollbackConfig, RollbackError, RollbackManager, RollbackReport};
pub use service::ServiceSpec;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expected non-zero-exit outcomes.
//!
//! A plan halting on a failed step is a normal result of running it, not a
//! bug in this program. Commands surface those outcomes as [`Halt`] so
//! `main` can print them bare and set the exit code, reserving the
//! `Error:` prefix for everything unexpected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Halt {
    #[error("plan halted at step {0}")]
    PlanHalted(u32),

    #[error("rollback incomplete: {0}")]
    RollbackIncomplete(String),

    #[error("Session {0} not found")]
    UnknownSession(String),
}

impl Halt {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

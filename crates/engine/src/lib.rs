// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-engine: sequential plan execution.
//!
//! Each step walks a small state machine: validate, confirm, execute,
//! verify, persist. The step record hits the store before the next step
//! starts, so a crash at any point resumes exactly where it left off.
//! Failures go through the recovery analyzer and, when a safe automatic
//! fix exists, get one fix-and-retry attempt before the plan halts.

mod confirm;
mod engine;
mod runner;
mod validate;

pub use confirm::{AutoApprove, ConfirmPrompt};
pub use engine::{Engine, EngineConfig, EngineError, PlanRunReport, StepOutcome};
pub use runner::{clamp_timeout, Runner, DEFAULT_TIMEOUT, MAX_TIMEOUT};
pub use validate::{validate_command, ValidationError, DANGEROUS_PATTERNS};

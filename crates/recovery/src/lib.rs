// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-recovery: turns failed command output into a [`pr_core::Diagnosis`].
//!
//! Two layers: an optional remote classifier behind a circuit breaker, and
//! a deterministic pattern table that always produces an answer. Analysis
//! is infallible; every classifier problem degrades to the pattern table.

mod analyzer;
mod classifier;
mod patterns;

pub use analyzer::{AnalyzeRequest, Analyzer};
pub use classifier::{
    Classifier, ClassifierConfig, ClassifierError, ClassifyRequest, HttpClassifier,
};
pub use patterns::diagnose;

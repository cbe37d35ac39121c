// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pr-resilience: circuit breakers and retry policies.
//!
//! Breakers guard calls to flaky external dependencies (the error
//! classifier, the docker daemon); retry policies wrap transient failures
//! with bounded exponential backoff. Both take a [`pr_core::Clock`] so
//! state transitions are testable without sleeping.

mod breaker;
mod registry;
mod retry;

pub use breaker::{
    BreakerConfig, BreakerError, BreakerMetrics, CircuitBreaker, CircuitOpenError, CircuitState,
};
pub use registry::BreakerRegistry;
pub use retry::RetryPolicy;

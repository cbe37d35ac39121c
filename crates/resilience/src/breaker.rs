// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit breaker for calls to external dependencies.
//!
//! Closed is normal operation. Enough consecutive-ish failures (successes
//! decay the count by one) open the circuit, which rejects calls outright
//! until the recovery timeout elapses. The first call after that moves the
//! circuit to half-open, where a small number of probe calls are admitted;
//! enough probe successes close the circuit again, any probe failure
//! reopens it.

use parking_lot::Mutex;
use pr_core::Clock;
use smol_str::SmolStr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Breaker tuning knobs. Constructed from config at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerConfig {
    /// Failures (net of success decay) that open the circuit.
    pub failure_threshold: u32,
    /// How long an open circuit rejects calls before probing.
    pub recovery_timeout: Duration,
    /// Probe calls admitted while half-open, and the number of probe
    /// successes required to close.
    pub half_open_max_calls: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            half_open_max_calls: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        };
        write!(f, "{s}")
    }
}

/// Rejection from an open (or probe-saturated half-open) circuit.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("circuit {name} is open, retry after {}s", retry_after.as_secs())]
pub struct CircuitOpenError {
    pub name: SmolStr,
    pub retry_after: Duration,
}

/// Error from [`CircuitBreaker::call`]: either the circuit rejected the
/// call, or the call itself failed (and was counted).
#[derive(Debug, Error)]
pub enum BreakerError<E: std::error::Error> {
    #[error(transparent)]
    Open(#[from] CircuitOpenError),
    #[error(transparent)]
    Inner(E),
}

/// Point-in-time snapshot for status output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerMetrics {
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    pub retry_after: Duration,
}

struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    half_open_calls: u32,
    last_failure: Option<Instant>,
}

/// Thread-safe circuit breaker. Share via `Arc`, typically out of a
/// [`crate::BreakerRegistry`].
pub struct CircuitBreaker<C: Clock> {
    name: SmolStr,
    config: BreakerConfig,
    clock: C,
    inner: Mutex<BreakerState>,
}

impl<C: Clock> CircuitBreaker<C> {
    pub fn new(name: impl Into<SmolStr>, config: BreakerConfig, clock: C) -> Self {
        Self {
            name: name.into(),
            config,
            clock,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                half_open_calls: 0,
                last_failure: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask permission for one call. Callers that get `Ok` must follow up
    /// with [`record_success`](Self::record_success) or
    /// [`record_failure`](Self::record_failure).
    pub fn acquire(&self) -> Result<(), CircuitOpenError> {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Ok(()),

            CircuitState::Open => {
                let retry_after = retry_after(&inner, &self.config, self.clock.now());
                if retry_after > Duration::ZERO {
                    return Err(CircuitOpenError {
                        name: self.name.clone(),
                        retry_after,
                    });
                }
                tracing::info!(circuit = %self.name, "entering half-open state");
                inner.state = CircuitState::HalfOpen;
                inner.success_count = 0;
                inner.half_open_calls = 1;
                Ok(())
            }

            CircuitState::HalfOpen => {
                if inner.half_open_calls >= self.config.half_open_max_calls {
                    return Err(CircuitOpenError {
                        name: self.name.clone(),
                        retry_after: Duration::ZERO,
                    });
                }
                inner.half_open_calls += 1;
                Ok(())
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state == CircuitState::HalfOpen {
            inner.success_count += 1;
            if inner.success_count >= self.config.half_open_max_calls {
                tracing::info!(circuit = %self.name, "recovered, closing");
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
                inner.success_count = 0;
                inner.half_open_calls = 0;
                inner.last_failure = None;
            }
        } else {
            // Successes decay the failure count so sporadic failures under
            // steady traffic never accumulate to the threshold.
            inner.failure_count = inner.failure_count.saturating_sub(1);
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.failure_count += 1;
        inner.last_failure = Some(self.clock.now());

        if inner.state == CircuitState::HalfOpen {
            tracing::warn!(circuit = %self.name, "probe failed, reopening");
            inner.state = CircuitState::Open;
        } else if inner.state == CircuitState::Closed
            && inner.failure_count >= self.config.failure_threshold
        {
            tracing::error!(
                circuit = %self.name,
                failures = inner.failure_count,
                timeout_secs = self.config.recovery_timeout.as_secs(),
                "failure threshold reached, opening"
            );
            inner.state = CircuitState::Open;
        }
    }

    /// Run `f` under the breaker, recording its outcome.
    pub fn call<T, E, F>(&self, f: F) -> Result<T, BreakerError<E>>
    where
        E: std::error::Error,
        F: FnOnce() -> Result<T, E>,
    {
        self.acquire()?;
        match f() {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure();
                Err(BreakerError::Inner(err))
            }
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub fn metrics(&self) -> BreakerMetrics {
        let inner = self.inner.lock();
        BreakerMetrics {
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            retry_after: retry_after(&inner, &self.config, self.clock.now()),
        }
    }
}

fn retry_after(inner: &BreakerState, config: &BreakerConfig, now: Instant) -> Duration {
    match (inner.state, inner.last_failure) {
        (CircuitState::Open, Some(last)) => config
            .recovery_timeout
            .saturating_sub(now.saturating_duration_since(last)),
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;

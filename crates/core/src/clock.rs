// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides monotonic and wall-clock time.
///
/// Monotonic time drives circuit-breaker cooldowns and step durations;
/// wall-clock time is what ends up in persisted records.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for tests, advanced manually.
#[derive(Clone)]
pub struct FakeClock {
    start: Instant,
    epoch: DateTime<Utc>,
    offset: Arc<Mutex<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            epoch: Utc.timestamp_opt(1_000_000, 0).single().unwrap_or_default(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance both monotonic and wall-clock time by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.offset.lock() += duration;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        let offset = *self.offset.lock();
        self.epoch + ChronoDuration::milliseconds(offset.as_millis() as i64)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;

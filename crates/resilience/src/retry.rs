// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential backoff for transient failures.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Retry parameters. `max_retries` counts retries, not calls: the
/// operation is invoked at most `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub exponential_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            exponential_base: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (zero-based), without jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.exponential_base.powi(attempt.min(i32::MAX as u32) as i32);
        let raw = self.base_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(raw.min(self.max_delay.as_secs_f64()))
    }

    /// Run `op` until it succeeds, a non-retriable error occurs, or the
    /// retry budget is exhausted. The final error is returned as-is.
    ///
    /// Each sleep gets uniform jitter of up to 10% of the backoff so
    /// simultaneous retries spread out.
    pub async fn run<T, E, F, Fut, P>(&self, mut is_retriable: P, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_retries || !is_retriable(&err) {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt);
                    let jitter = delay.mul_f64(rand::thread_rng().gen_range(0.0..=0.1));
                    tracing::debug!(
                        attempt = attempt + 1,
                        delay_ms = (delay + jitter).as_millis() as u64,
                        "backing off before retry"
                    );
                    tokio::time::sleep(delay + jitter).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

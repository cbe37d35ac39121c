// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named breakers, built once at startup and handed out as `Arc`s.

use crate::breaker::{BreakerConfig, CircuitBreaker};
use pr_core::Clock;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns every breaker in the process. There are no global breakers; the
/// composition root builds one registry and passes shares down.
pub struct BreakerRegistry<C: Clock> {
    clock: C,
    breakers: HashMap<SmolStr, Arc<CircuitBreaker<C>>>,
}

impl<C: Clock> BreakerRegistry<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            breakers: HashMap::new(),
        }
    }

    /// Register a breaker under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<SmolStr>, config: BreakerConfig) -> Arc<CircuitBreaker<C>> {
        let name = name.into();
        let breaker = Arc::new(CircuitBreaker::new(
            name.clone(),
            config,
            self.clock.clone(),
        ));
        self.breakers.insert(name, Arc::clone(&breaker));
        breaker
    }

    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker<C>>> {
        self.breakers.get(name).cloned()
    }

    /// All breakers, for status output.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CircuitBreaker<C>>> {
        self.breakers.values()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

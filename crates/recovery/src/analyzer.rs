// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure analysis front door.
//!
//! Tries the remote classifier when one is configured and its circuit is
//! closed; every other path lands on the deterministic pattern table.

use crate::classifier::{Classifier, ClassifyRequest};
use crate::patterns::diagnose;
use pr_core::{truncate_chars, Clock, Diagnosis};
use pr_resilience::CircuitBreaker;
use std::sync::Arc;

/// Hard bound on every analyzer input.
pub const MAX_INPUT_CHARS: usize = 5000;

/// One failed command, as the engine saw it.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Rendered command line.
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// Step context (name, hint, plan metadata), passed through opaquely.
    pub context: serde_json::Value,
}

pub struct Analyzer<C: Clock> {
    classifier: Option<Arc<dyn Classifier>>,
    breaker: Arc<CircuitBreaker<C>>,
}

impl<C: Clock> Analyzer<C> {
    /// Pattern-table-only analyzer.
    pub fn new(breaker: Arc<CircuitBreaker<C>>) -> Self {
        Self {
            classifier: None,
            breaker,
        }
    }

    pub fn with_classifier(
        classifier: Arc<dyn Classifier>,
        breaker: Arc<CircuitBreaker<C>>,
    ) -> Self {
        Self {
            classifier: Some(classifier),
            breaker,
        }
    }

    /// Analyze a failure. Infallible: the worst case is the generic
    /// manual-intervention diagnosis from the pattern table.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Diagnosis {
        let command = truncate_chars(&request.command, MAX_INPUT_CHARS);
        let stdout = truncate_chars(&request.stdout, MAX_INPUT_CHARS);
        let stderr = truncate_chars(&request.stderr, MAX_INPUT_CHARS);

        if let Some(classifier) = &self.classifier {
            match self.breaker.acquire() {
                Ok(()) => {
                    let classify = ClassifyRequest {
                        command: command.to_string(),
                        stdout: stdout.to_string(),
                        stderr: stderr.to_string(),
                        context: request.context.clone(),
                    };
                    match classifier.classify(classify).await {
                        Ok(diagnosis) => {
                            self.breaker.record_success();
                            return diagnosis;
                        }
                        Err(err) => {
                            self.breaker.record_failure();
                            tracing::warn!(error = %err, "classifier failed, using pattern table");
                        }
                    }
                }
                Err(open) => {
                    tracing::debug!(
                        retry_after_secs = open.retry_after.as_secs(),
                        "classifier circuit open, using pattern table"
                    );
                }
            }
        }

        diagnose(command, stdout, stderr)
    }
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;

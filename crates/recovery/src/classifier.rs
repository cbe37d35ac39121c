// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote error classifier.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. The model is
//! asked for a JSON diagnosis; missing fields backfill with safe defaults
//! through [`Diagnosis`]'s serde defaults, so a sparse response still
//! deserializes into something the engine can act on.

use async_trait::async_trait;
use pr_core::Diagnosis;
use pr_resilience::RetryPolicy;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Backoff for transient transport failures. Kept short so a dead endpoint
/// degrades to the pattern table quickly.
const TRANSPORT_RETRY: RetryPolicy = RetryPolicy {
    max_retries: 2,
    base_delay: Duration::from_millis(500),
    max_delay: Duration::from_secs(5),
    exponential_base: 2.0,
};

const SYSTEM_PROMPT: &str = r#"You are a Linux troubleshooting expert. Given a failed command and its error output, suggest the most likely fix.

Respond with JSON in this format:
{
  "analysis": "Brief explanation of what went wrong",
  "severity": "low|medium|high|critical",
  "suggested_fix": "Human-readable description of the fix",
  "fix_command": ["program", "arg1", "arg2"],
  "fix_type": "retry|modify_command|install_dependency|manual_intervention|skip",
  "alternative_fixes": ["Other options if the primary fix fails"],
  "can_auto_retry": true,
  "explanation": "Simple explanation for a non-technical user"
}

Rules:
- "fix_command" must be an argument vector, never a shell string. Omit it when there is no single safe command.
- Respond only with valid JSON. Do not include markdown fences or other text."#;

/// What the classifier gets to see about a failure. Inputs are truncated
/// by the analyzer before they reach this type.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub context: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier transport error: {0}")]
    Transport(String),

    #[error("classifier returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("classifier response malformed: {0}")]
    Malformed(String),

    #[error("classifier task aborted")]
    Aborted,
}

/// Anything that can turn a failure into a [`Diagnosis`]. The engine only
/// ever sees this trait; tests substitute stubs.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: ClassifyRequest) -> Result<Diagnosis, ClassifierError>;
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Full chat-completions URL.
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP classifier over a blocking `ureq` agent, bridged into async with
/// `spawn_blocking`. Transient transport failures are retried with a short
/// backoff before the error surfaces to the breaker.
pub struct HttpClassifier {
    config: ClassifierConfig,
    agent: ureq::Agent,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .build();
        Self { config, agent }
    }

    fn request_body(&self, request: &ClassifyRequest) -> serde_json::Value {
        let user = format!(
            "Command failed:\n```\n{}\n```\n\nstdout:\n```\n{}\n```\n\nstderr:\n```\n{}\n```\n\nStep context:\n```json\n{}\n```\n\nAnalyze the error and suggest a fix.",
            request.command, request.stdout, request.stderr, request.context
        );
        serde_json::json!({
            "model": self.config.model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user },
            ],
        })
    }

    async fn attempt(&self, request: &ClassifyRequest) -> Result<Diagnosis, ClassifierError> {
        let agent = self.agent.clone();
        let endpoint = self.config.endpoint.clone();
        let api_key = self.config.api_key.clone();
        let body = self.request_body(request);

        tokio::task::spawn_blocking(move || {
            let mut post = agent.post(&endpoint).set("content-type", "application/json");
            if let Some(key) = &api_key {
                post = post.set("authorization", &format!("Bearer {key}"));
            }
            let response = match post.send_json(body) {
                Ok(response) => response,
                Err(ureq::Error::Status(status, response)) => {
                    let message = response.into_string().unwrap_or_default();
                    return Err(ClassifierError::Status { status, message });
                }
                Err(err) => return Err(ClassifierError::Transport(err.to_string())),
            };
            let envelope: serde_json::Value = response
                .into_json()
                .map_err(|err| ClassifierError::Malformed(err.to_string()))?;
            parse_completion(&envelope)
        })
        .await
        .map_err(|_| ClassifierError::Aborted)?
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, request: ClassifyRequest) -> Result<Diagnosis, ClassifierError> {
        TRANSPORT_RETRY
            .run(
                |err: &ClassifierError| matches!(err, ClassifierError::Transport(_)),
                |_attempt| self.attempt(&request),
            )
            .await
    }
}

/// Pull the diagnosis JSON out of a chat-completions envelope.
fn parse_completion(envelope: &serde_json::Value) -> Result<Diagnosis, ClassifierError> {
    let content = envelope["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice["message"]["content"].as_str())
        .ok_or_else(|| ClassifierError::Malformed("no message content".to_string()))?;

    let trimmed = strip_code_fences(content);
    serde_json::from_str(trimmed).map_err(|err| ClassifierError::Malformed(err.to_string()))
}

/// Models sometimes fence JSON despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

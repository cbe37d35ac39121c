// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure diagnoses produced by the recovery analyzer.
//!
//! Every field deserializes with a safe default so a partial classifier
//! response never leaves downstream logic branching on absent data.

use crate::CommandLine;
use serde::{Deserialize, Serialize};

/// How bad the failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

/// The class of remediation a diagnosis suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    Retry,
    ModifyCommand,
    InstallDependency,
    ManualIntervention,
    Skip,
}

impl Default for FixType {
    fn default() -> Self {
        Self::ManualIntervention
    }
}

/// Structured diagnosis of a failed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnosis {
    pub analysis: String,
    pub severity: Severity,
    /// Human-readable suggestion.
    pub suggested_fix: String,
    /// Executable form of the suggestion, when one exists. Only diagnoses
    /// with both `can_auto_retry` and `fix_type == ModifyCommand` get their
    /// fix command run automatically.
    pub fix_command: Option<CommandLine>,
    pub fix_type: FixType,
    pub alternative_fixes: Vec<String>,
    pub can_auto_retry: bool,
    pub explanation: String,
}

impl Default for Diagnosis {
    fn default() -> Self {
        Self {
            analysis: "Unknown error occurred".to_string(),
            severity: Severity::default(),
            suggested_fix: "Check error logs for details".to_string(),
            fix_command: None,
            fix_type: FixType::default(),
            alternative_fixes: Vec::new(),
            can_auto_retry: false,
            explanation: String::new(),
        }
    }
}

impl Diagnosis {
    /// True when the engine may attempt the suggested fix without a human.
    pub fn auto_fixable(&self) -> bool {
        self.can_auto_retry && self.fix_type == FixType::ModifyCommand && self.fix_command.is_some()
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
///
/// Bounds analyzer inputs before any processing so a pathological command
/// output cannot blow up memory or classifier token use.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[path = "diagnosis_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-execution safety validation.
//!
//! A deny-list of catastrophic command shapes, matched case-insensitively
//! against the space-joined argument vector. Validation never executes
//! anything and an empty command is always rejected.

use pr_core::CommandLine;
use thiserror::Error;

/// Patterns that are never allowed to run, lowercase. Substring match
/// over the lowercased rendered command.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "rm -rf /",
    "mkfs",
    // fork bomb
    ":(){ :|:& };:",
    "dd if=/dev/zero",
    "of=/dev/sd",
    "> /dev/sda",
    ">/dev/sda",
    "shred /dev/",
    "mv /* /dev/null",
    "chmod -r 777 /",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty command")]
    Empty,

    #[error("command contains dangerous pattern: {0}")]
    Dangerous(&'static str),
}

/// Check a command against the deny-list.
pub fn validate_command(command: &CommandLine) -> Result<(), ValidationError> {
    if command.is_empty() {
        return Err(ValidationError::Empty);
    }

    let rendered = command.rendered().to_lowercase();
    for pattern in DANGEROUS_PATTERNS {
        if rendered.contains(pattern) {
            return Err(ValidationError::Dangerous(pattern));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

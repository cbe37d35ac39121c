// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Seam for interactive confirmation of privileged steps.
///
/// The engine never reads stdin itself; callers supply a prompt (the CLI
/// wires a terminal prompt, tests wire canned answers).
pub trait ConfirmPrompt: Send + Sync {
    /// Returns true when the user approves.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything. Used for `--yes` runs.
pub struct AutoApprove;

impl ConfirmPrompt for AutoApprove {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured command lines.
//!
//! Every command in a plan is an argument vector. There is deliberately no
//! way to build a `CommandLine` from a single shell string: interpolated
//! shell commands were an injection risk in the system this replaces.

use serde::{Deserialize, Serialize};

/// A command as an argument vector: program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// The program to spawn, if any.
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// True when there is nothing to execute: no words at all, or a
    /// whitespace-only program.
    pub fn is_empty(&self) -> bool {
        match self.0.first() {
            None => true,
            Some(program) => program.trim().is_empty(),
        }
    }

    /// Space-joined rendering for logs and safety matching. Never fed back
    /// to a shell.
    pub fn rendered(&self) -> String {
        self.0.join(" ")
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered())
    }
}

impl<S: Into<String>> FromIterator<S> for CommandLine {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;

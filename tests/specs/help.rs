// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs.

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn run_help_shows_usage() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--dry-run")
        .stdout_has("--resume-from");
}

#[test]
fn session_help_shows_subcommands() {
    cli()
        .args(&["session", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("show");
}

#[test]
fn backup_help_shows_subcommands() {
    cli()
        .args(&["backup", "--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("list")
        .stdout_has("rollback")
        .stdout_has("delete");
}

#[test]
fn version_shows_name() {
    cli().args(&["--version"]).passes().stdout_has("planrun");
}

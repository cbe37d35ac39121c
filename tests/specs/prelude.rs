// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for binary specs.
//!
//! Each [`Project`] is an isolated temp directory with its own config,
//! ledger, and backup store, so specs never share state.

use std::path::{Path, PathBuf};

pub use serial_test::serial;

pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = Self { dir };
        project.file(
            "planrun.toml",
            &format!(
                "state_path = \"{}\"\nbackup_dir = \"{}\"\n",
                project.path("ledger.jsonl").display(),
                project.path("backups").display()
            ),
        );
        project
    }

    /// Append extra config sections (service entries and the like).
    pub fn config(&self, extra: &str) {
        let path = self.path("planrun.toml");
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str(extra);
        std::fs::write(&path, text).unwrap();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn plan(&self, name: &str, plan: &serde_json::Value) -> PathBuf {
        self.file(name, &serde_json::to_string_pretty(plan).unwrap())
    }

    pub fn planrun(&self) -> Spec {
        let mut cmd = assert_cmd::Command::cargo_bin("planrun").unwrap();
        cmd.arg("--config").arg(self.path("planrun.toml"));
        cmd.current_dir(self.dir.path());
        Spec { cmd }
    }

    pub fn store(&self) -> pr_storage::Store {
        pr_storage::Store::open(self.path("ledger.jsonl")).unwrap()
    }
}

/// Bare binary invocation without a project config.
pub fn cli() -> Spec {
    Spec {
        cmd: assert_cmd::Command::cargo_bin("planrun").unwrap(),
    }
}

pub struct Spec {
    cmd: assert_cmd::Command,
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn arg_path(mut self, path: &Path) -> Self {
        self.cmd.arg(path);
        self
    }

    pub fn passes(mut self) -> Checked {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Checked { output }
    }

    pub fn fails(mut self) -> Checked {
        let output = self.cmd.output().unwrap();
        assert!(
            !output.status.success(),
            "expected failure, got success\nstdout: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        Checked { output }
    }
}

pub struct Checked {
    output: std::process::Output,
}

impl Checked {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout().contains(needle),
            "stdout missing {needle:?}\nstdout: {}",
            self.stdout()
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout().contains(needle),
            "stdout unexpectedly contains {needle:?}\nstdout: {}",
            self.stdout()
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr().contains(needle),
            "stderr missing {needle:?}\nstderr: {}",
            self.stderr()
        );
        self
    }

    pub fn stderr_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stderr().contains(needle),
            "stderr unexpectedly contains {needle:?}\nstderr: {}",
            self.stderr()
        );
        self
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic pattern-table diagnosis.
//!
//! Substring patterns are checked in a fixed order against the lowercased
//! combined output, then command-scoped families (docker, apt) are tried,
//! then a generic manual-intervention diagnosis wins. Never fails.

use pr_core::{truncate_chars, CommandLine, Diagnosis, FixType, Severity};

struct Rule {
    pattern: &'static str,
    fix_type: FixType,
    suggestion: &'static str,
}

// Checked first, in order. First match wins.
const COMMON_RULES: &[Rule] = &[
    Rule {
        pattern: "command not found",
        fix_type: FixType::InstallDependency,
        suggestion: "Install the missing package with apt",
    },
    Rule {
        pattern: "permission denied",
        fix_type: FixType::ModifyCommand,
        suggestion: "Try running with sudo",
    },
    Rule {
        pattern: "could not resolve host",
        fix_type: FixType::Retry,
        suggestion: "Check internet connection and retry",
    },
    Rule {
        pattern: "port is already allocated",
        fix_type: FixType::ModifyCommand,
        suggestion: "Stop the existing service or use a different port",
    },
    Rule {
        pattern: "address already in use",
        fix_type: FixType::ModifyCommand,
        suggestion: "Port in use, find the holder with: sudo lsof -i :PORT",
    },
];

/// Diagnose a failure from its command and captured output.
pub fn diagnose(command: &str, stdout: &str, stderr: &str) -> Diagnosis {
    let command = truncate_chars(command, 5000).to_lowercase();
    let error_text = format!(
        "{}{}",
        truncate_chars(stderr, 5000),
        truncate_chars(stdout, 5000)
    )
    .to_lowercase();

    for rule in COMMON_RULES {
        if error_text.contains(rule.pattern) {
            return Diagnosis {
                analysis: format!("Detected '{}' error", rule.pattern),
                severity: Severity::Medium,
                suggested_fix: rule.suggestion.to_string(),
                fix_command: None,
                fix_type: rule.fix_type,
                alternative_fixes: vec![],
                can_auto_retry: matches!(rule.fix_type, FixType::Retry | FixType::ModifyCommand),
                explanation: format!(
                    "The command failed because of '{}'. {}.",
                    rule.pattern, rule.suggestion
                ),
            };
        }
    }

    if command.contains("docker") {
        return docker_diagnosis(&error_text);
    }

    if error_text.contains("connection refused") || error_text.contains("connection timed out") {
        return Diagnosis {
            analysis: "Network connectivity issue".to_string(),
            severity: Severity::Medium,
            suggested_fix: "Check internet connection and retry".to_string(),
            fix_command: None,
            fix_type: FixType::Retry,
            alternative_fixes: vec!["Check firewall settings".to_string()],
            can_auto_retry: true,
            explanation: "There was a network problem. Retrying may help.".to_string(),
        };
    }

    if error_text.contains("no space left") || error_text.contains("disk full") {
        return Diagnosis {
            analysis: "Disk space exhausted".to_string(),
            severity: Severity::Critical,
            suggested_fix: "Free up disk space: df -h".to_string(),
            fix_command: None,
            fix_type: FixType::ManualIntervention,
            alternative_fixes: vec![
                "Clean up temporary files".to_string(),
                "Remove old Docker images".to_string(),
            ],
            can_auto_retry: false,
            explanation: "The disk is full. Space must be freed before continuing.".to_string(),
        };
    }

    if command.contains("apt") {
        return apt_diagnosis(&error_text);
    }

    Diagnosis {
        explanation: format!(
            "Something went wrong: {}. Manual intervention may be needed.",
            truncate_chars(stderr, 100)
        ),
        alternative_fixes: vec![
            "Skip this step and continue".to_string(),
            "Rollback and retry".to_string(),
        ],
        ..Diagnosis::default()
    }
}

fn docker_diagnosis(error_text: &str) -> Diagnosis {
    if error_text.contains("cannot connect") {
        return Diagnosis {
            analysis: "Docker daemon not running".to_string(),
            severity: Severity::High,
            suggested_fix: "sudo systemctl start docker".to_string(),
            fix_command: Some(CommandLine::new(["sudo", "systemctl", "start", "docker"])),
            fix_type: FixType::ModifyCommand,
            alternative_fixes: vec!["sudo service docker start".to_string()],
            can_auto_retry: true,
            explanation: "The Docker service is not running and can be started.".to_string(),
        };
    }

    if error_text.contains("image not found") || error_text.contains("pull access denied") {
        return Diagnosis {
            analysis: "Docker image not found or access denied".to_string(),
            severity: Severity::Medium,
            suggested_fix: "Check image name and try again".to_string(),
            fix_command: None,
            fix_type: FixType::Retry,
            alternative_fixes: vec!["Use alternative image".to_string()],
            can_auto_retry: true,
            explanation: "The Docker image could not be downloaded. Retrying may help.".to_string(),
        };
    }

    if error_text.contains("container name") && error_text.contains("already in use") {
        return Diagnosis {
            analysis: "Container with this name already exists".to_string(),
            severity: Severity::Low,
            suggested_fix: "Remove the existing container: docker rm -f NAME".to_string(),
            fix_command: None,
            fix_type: FixType::ModifyCommand,
            alternative_fixes: vec!["Use different container name".to_string()],
            can_auto_retry: true,
            explanation: "A container with this name already exists and can be removed."
                .to_string(),
        };
    }

    Diagnosis {
        analysis: "Docker error occurred".to_string(),
        suggested_fix: "Check Docker status: sudo systemctl status docker".to_string(),
        explanation: "A Docker error occurred. Check the Docker service status.".to_string(),
        ..Diagnosis::default()
    }
}

fn apt_diagnosis(error_text: &str) -> Diagnosis {
    if error_text.contains("unable to locate package") {
        return Diagnosis {
            analysis: "Package not found in repository".to_string(),
            severity: Severity::Medium,
            suggested_fix: "sudo apt update".to_string(),
            fix_command: Some(CommandLine::new(["sudo", "apt", "update"])),
            fix_type: FixType::ModifyCommand,
            alternative_fixes: vec!["Enable universe/multiverse repositories".to_string()],
            can_auto_retry: true,
            explanation: "The package was not found. Updating package lists may fix this."
                .to_string(),
        };
    }

    if error_text.contains("could not get lock") {
        return Diagnosis {
            analysis: "Another package manager is running".to_string(),
            severity: Severity::Medium,
            suggested_fix: "Wait for the other package manager to complete".to_string(),
            fix_command: None,
            fix_type: FixType::Retry,
            alternative_fixes: vec!["Kill other apt process: sudo killall apt".to_string()],
            can_auto_retry: true,
            explanation: "Another package installation is in progress. Waiting and retrying."
                .to_string(),
        };
    }

    if error_text.contains("broken packages") {
        return Diagnosis {
            analysis: "Package dependencies are broken".to_string(),
            severity: Severity::High,
            suggested_fix: "sudo apt --fix-broken install".to_string(),
            fix_command: Some(CommandLine::new(["sudo", "apt", "--fix-broken", "install"])),
            fix_type: FixType::ModifyCommand,
            alternative_fixes: vec!["sudo dpkg --configure -a".to_string()],
            can_auto_retry: true,
            explanation: "Package dependencies are broken and may be repairable.".to_string(),
        };
    }

    Diagnosis {
        analysis: "Package manager error occurred".to_string(),
        suggested_fix: "Check apt status and try again".to_string(),
        explanation: "A package manager error occurred. It may need manual attention.".to_string(),
        ..Diagnosis::default()
    }
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;

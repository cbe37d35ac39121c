// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    wipe_root = { &["rm", "-rf", "/"] },
    wipe_root_glob = { &["rm", "-rf", "/*"] },
    wipe_subtree = { &["sudo", "rm", "-rf", "/etc"] },
    mkfs = { &["mkfs", "/dev/sda1"] },
    mkfs_ext4 = { &["mkfs.ext4", "/dev/sda"] },
    fork_bomb = { &[":(){ :|:& };:"] },
    dd_zero = { &["dd", "if=/dev/zero", "of=/swap"] },
    dd_device = { &["dd", "if=/dev/urandom", "of=/dev/sda"] },
    clobber_device = { &["sh", "-c", "cat x > /dev/sda"] },
    clobber_device_tight = { &["sh", "-c", "cat x >/dev/sda"] },
    shred_device = { &["shred", "/dev/sda"] },
    mv_to_null = { &["sh", "-c", "mv /* /dev/null"] },
    chmod_root = { &["chmod", "-R", "777", "/"] },
    uppercase = { &["RM", "-RF", "/"] },
)]
fn dangerous_commands_are_rejected(argv: &[&str]) {
    let command = pr_core::CommandLine::new(argv.iter().copied());
    assert!(matches!(
        validate_command(&command),
        Err(ValidationError::Dangerous(_))
    ));
}

#[parameterized(
    echo = { &["echo", "hello"] },
    apt = { &["sudo", "apt-get", "install", "-y", "docker.io"] },
    relative_rm = { &["rm", "-rf", "./build"] },
    docker = { &["docker", "run", "-d", "--name", "jellyfin", "jellyfin/jellyfin"] },
    chmod_scoped = { &["chmod", "-R", "755", "/home/user/data"] },
)]
fn ordinary_commands_pass(argv: &[&str]) {
    let command = pr_core::CommandLine::new(argv.iter().copied());
    assert!(validate_command(&command).is_ok());
}

#[parameterized(
    no_words = { &[] as &[&str] },
    blank_program = { &["   "] },
)]
fn empty_commands_are_rejected(argv: &[&str]) {
    let command = pr_core::CommandLine::new(argv.iter().copied());
    assert_eq!(validate_command(&command), Err(ValidationError::Empty));
}

#[test]
fn every_pattern_is_lowercase() {
    // Matching lowercases the command once; patterns must already be
    // lowercase or they can never hit.
    for pattern in DANGEROUS_PATTERNS {
        assert_eq!(*pattern, pattern.to_lowercase());
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem helpers for snapshot and restore.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Recursively copy `src` into `dst`, creating `dst`. Returns the number
/// of files copied. Symlinks are skipped with a warning; service data
/// directories should not contain links that matter.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<u64> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            copied += copy_dir_recursive(&entry.path(), &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping non-regular file");
        }
    }
    Ok(copied)
}

/// Hex sha256 of a file's contents.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "fsops_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn copies_nested_trees() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("sub/deeper")).unwrap();
    fs::write(src.join("a.txt"), "alpha").unwrap();
    fs::write(src.join("sub/b.txt"), "beta").unwrap();
    fs::write(src.join("sub/deeper/c.txt"), "gamma").unwrap();

    let dst = dir.path().join("dst");
    let copied = copy_dir_recursive(&src, &dst).unwrap();

    assert_eq!(copied, 3);
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "alpha");
    assert_eq!(
        fs::read_to_string(dst.join("sub/deeper/c.txt")).unwrap(),
        "gamma"
    );
}

#[test]
fn empty_directory_copies_to_empty_directory() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();

    let dst = dir.path().join("dst");
    assert_eq!(copy_dir_recursive(&src, &dst).unwrap(), 0);
    assert!(dst.is_dir());
}

#[test]
fn sha256_matches_known_digest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("f");
    fs::write(&path, "abc").unwrap();

    assert_eq!(
        sha256_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

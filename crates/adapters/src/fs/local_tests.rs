// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn reads_a_file_relative_to_the_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("charm.tar.gz"), b"charm bytes").unwrap();
    let fs = LocalFs::new(dir.path().to_string_lossy().to_string());

    let bytes = fs.read_file("charm.tar.gz").await.unwrap();

    assert_eq!(bytes, b"charm bytes");
    assert_eq!(fs.get_params().path, dir.path().to_string_lossy().to_string());
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let fs = LocalFs::new(dir.path().to_string_lossy().to_string());

    let err = fs.read_file("nope").await.unwrap_err();

    assert!(matches!(err, FsError::NotFound(_)));
}

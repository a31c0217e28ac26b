// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;
use tempfile::tempdir;

fn key(bucket: &str, job: &str, name: &str) -> ObjectKey {
    ObjectKey {
        bucket: bucket.into(),
        prefix: "renders".into(),
        cloud_job_id: job.into(),
        key: name.into(),
    }
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let store = LocalObjectStore::new(dir.path().to_path_buf());
    let k = key("sub-bucket", "cloud-123", "approved.json");

    store.put(&k, b"{\"approved\":true}".to_vec()).await.unwrap();
    let bytes = store.get(&k).await.unwrap();
    assert_eq!(bytes, b"{\"approved\":true}");
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let dir = tempdir().unwrap();
    let store = LocalObjectStore::new(dir.path().to_path_buf());
    let k = key("sub-bucket", "cloud-123", "approved.json");

    let err = store.get(&k).await.unwrap_err();
    assert!(matches!(err, ObjectStoreError::NotFound(_)));
    assert!(!store.exists(&k).await);
}

#[tokio::test]
async fn write_atomic_leaves_no_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("job.json");
    write_atomic(&path, b"{}").await.unwrap();

    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"{}");
    assert!(!path.with_extension("tmp").exists());
}

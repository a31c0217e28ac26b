// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Artifact access for the remote worker plane's `<bucket>/<prefix>/
//! <cloud_job_id>/` layout. No registry crate in this pack depends on a
//! concrete object-storage SDK, so this is a small trait with a
//! filesystem-backed implementation that honors the same contract a real
//! bucket client would: atomic write-then-rename, "missing key" distinct
//! from "transient error".

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One artifact location: `<bucket>/<prefix>/<cloud_job_id>/<key>`.
#[derive(Debug, Clone)]
pub struct ObjectKey {
    pub bucket: String,
    pub prefix: String,
    pub cloud_job_id: String,
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` atomically (write-then-rename at the object store
    /// level).
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), ObjectStoreError>;

    /// Read an artifact. `NotFound` must be returned (not a generic error)
    /// when the key is absent — callers rely on this to distinguish "not
    /// ready yet" from a real failure.
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, ObjectStoreError>;

    async fn exists(&self, key: &ObjectKey) -> bool {
        self.get(key).await.is_ok()
    }
}

/// Filesystem-backed store rooted at a local directory, standing in for a
/// real bucket client (manual/local-dev cloud trigger mode, and the
/// default in tests).
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &ObjectKey) -> PathBuf {
        self.root.join(&key.bucket).join(&key.prefix).join(&key.cloud_job_id).join(&key.key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<(), ObjectStoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, ObjectStoreError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::NotFound(key.key.clone()))
            }
            Err(e) => Err(ObjectStoreError::Io(e)),
        }
    }
}

/// Atomically write `bytes` to `path` on the local filesystem: used for the
/// orchestrator's own delivery/approved artifacts, outside the cloud
/// bucket.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;

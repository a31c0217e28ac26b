// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Records which cloud job a submitted file maps to, so a later poll can
//! rebuild the object key without needing it threaded back through the
//! job record.

use reelforge_adapters::ObjectKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudLink {
    pub bucket: String,
    pub prefix: String,
    pub cloud_job_id: String,
}

impl CloudLink {
    pub fn object_key(&self, key: impl Into<String>) -> ObjectKey {
        ObjectKey {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            cloud_job_id: self.cloud_job_id.clone(),
            key: key.into(),
        }
    }
}

pub async fn write(path: &Path, link: &CloudLink) -> std::io::Result<()> {
    let bytes = serde_json::to_vec(link).unwrap_or_default();
    reelforge_adapters::write_atomic(path, &bytes).await
}

pub async fn read(path: &Path) -> std::io::Result<Option<CloudLink>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes).ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "cloud_link_tests.rs"]
mod tests;

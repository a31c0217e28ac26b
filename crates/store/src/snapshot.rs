// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Snapshot persistence for crash recovery.
//!
//! A snapshot captures the complete [`MaterializedState`] at a WAL sequence
//! number. Recovery loads the newest valid snapshot and replays WAL entries
//! after that sequence (`Checkpointer`, in `checkpoint.rs`).

use crate::migration::MigrationError;
use crate::state::MaterializedState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("compression error: {0}")]
    Compression(String),
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at: DateTime<Utc>,
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Atomically write `snapshot` to `path`: serialize, zstd-compress, write to
/// a sibling temp file, fsync, then rename over the target. The previous
/// snapshot at `path`, if any, is rotated into a `.bak` file rather than
/// discarded.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let json = serde_json::to_vec(snapshot)?;
    let compressed = zstd::encode_all(json.as_slice(), 3)
        .map_err(|e| SnapshotError::Compression(e.to_string()))?;

    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(&compressed)?;
        tmp.sync_all()?;
    }

    if path.exists() {
        let bak = rotate_bak_path(path);
        fs::rename(path, bak)?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a snapshot from `path`, migrating it forward if its schema version
/// is older than [`CURRENT_SNAPSHOT_VERSION`]. Returns `Ok(None)` if no
/// snapshot file exists yet (a fresh Store).
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }
    let compressed = fs::read(path)?;
    let json = zstd::decode_all(compressed.as_slice())
        .map_err(|e| SnapshotError::Compression(e.to_string()))?;
    let value: serde_json::Value = serde_json::from_slice(&json)?;

    let registry = crate::migration::MigrationRegistry::new();
    let migrated = registry.migrate_to(value, CURRENT_SNAPSHOT_VERSION)?;
    let snapshot: Snapshot = serde_json::from_value(migrated)?;
    Ok(Some(snapshot))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

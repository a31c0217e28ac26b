// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Artifact paths, rooted at the configured work/delivery directories. The
//! relative structure is part of the contract with collaborators, not an
//! implementation detail — changing it breaks whatever produces/consumes
//! these files.

use reelforge_core::{FileStem, OrchestratorConfig};
use std::path::PathBuf;

pub fn source_path(config: &OrchestratorConfig, stem: &FileStem, ext: &str) -> PathBuf {
    config.work_dir.join("vault/source").join(format!("{stem}.{ext}"))
}

pub fn audio_path(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("vault/audio").join(format!("{stem}.wav"))
}

pub fn skeleton_path(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("vault/data").join(format!("{stem}_skeleton.json"))
}

pub fn approved_path(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("translated").join(format!("{stem}_approved.json"))
}

pub fn delivery_path(config: &OrchestratorConfig, stem: &FileStem, ext: &str) -> PathBuf {
    config.delivery_dir.join(format!("{stem}.{ext}"))
}

pub fn errors_dir(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("errors").join(stem.as_str())
}

/// Where the cloud submission's identity (cloud_job_id/bucket/prefix) is
/// recorded, so a later poll can rebuild the object key without having to
/// round-trip it through the job record.
pub fn cloud_link_path(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("vault/data").join(format!("{stem}_cloud_link.json"))
}

/// Where the finalizer writes the subtitle/caption document the burner
/// consumes next.
pub fn finalized_path(config: &OrchestratorConfig, stem: &FileStem) -> PathBuf {
    config.work_dir.join("vault/data").join(format!("{stem}_finalized.json"))
}

/// Every domain suffix a `vault/data` filename can carry ahead of its
/// extension, in the order they should be tried when recovering the
/// owning job's `file_stem` from a bare filename.
const VAULT_DATA_SUFFIXES: &[&str] = &["_skeleton", "_cloud_link", "_finalized"];

/// Recover the owning job's `file_stem` from a `vault/data` artifact's
/// filename. Unlike every other watched directory, `vault/data`
/// filenames carry a domain suffix (`_skeleton`/`_cloud_link`/
/// `_finalized`) ahead of the extension, so `FileStem::from_filename`
/// alone — which only strips the extension — would return
/// `"<stem>_skeleton"` instead of `"<stem>"`.
pub fn vault_data_owner_stem(filename: &str) -> FileStem {
    let stem = FileStem::from_filename(filename);
    for suffix in VAULT_DATA_SUFFIXES {
        if let Some(bare) = stem.as_str().strip_suffix(suffix) {
            return FileStem::from(bare);
        }
    }
    stem
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Startup reconciliation: scans `vault/` and `delivery/` for artifacts
//! with no matching `Store` row — the process crashed between writing an
//! artifact and committing the WAL entry for it — and quarantines them
//! rather than leaving them to be silently picked up or silently ignored.
//! Grounded in the teacher's `lifecycle::reconcile` / breadcrumb-orphan
//! handling, adapted from "replay a synthetic failed job" (the teacher has
//! a job record to resurrect) to "move the artifact aside" (this
//! orchestrator has no job record to attach it to at all).

use std::path::{Path, PathBuf};

use reelforge_core::{FileStem, OrchestratorConfig};
use reelforge_engine::paths;
use reelforge_store::{Store, StoreError};
use tracing::{info, warn};

/// One artifact directory to check, and the job stage whose presence
/// would explain it.
struct WatchedDir {
    dir: PathBuf,
    label: &'static str,
}

fn watched_dirs(config: &OrchestratorConfig) -> Vec<WatchedDir> {
    vec![
        WatchedDir { dir: config.work_dir.join("vault/source"), label: "vault/source" },
        WatchedDir { dir: config.work_dir.join("vault/audio"), label: "vault/audio" },
        WatchedDir { dir: config.work_dir.join("vault/data"), label: "vault/data" },
        WatchedDir { dir: config.delivery_dir.clone(), label: "delivery" },
    ]
}

/// Move `path` into `<work_dir>/quarantine/<label>/`, preserving the
/// filename, so an operator can inspect or discard it without it
/// continuing to masquerade as live orchestrator output.
async fn quarantine(config: &OrchestratorConfig, label: &str, path: &Path) -> std::io::Result<()> {
    let quarantine_dir = config.work_dir.join("quarantine").join(label);
    tokio::fs::create_dir_all(&quarantine_dir).await?;
    let Some(name) = path.file_name() else { return Ok(()) };
    tokio::fs::rename(path, quarantine_dir.join(name)).await
}

/// Scan every artifact directory for files whose stem no longer
/// corresponds to a job in `store`, and quarantine them. Called once at
/// startup, before the first engine tick, so a stale artifact from a
/// previous crash never gets reconciled into "done" for a job that no
/// longer exists (or worse, a newer job that happens to share a stem).
pub async fn run<C: reelforge_core::Clock>(
    config: &OrchestratorConfig,
    store: &Store<C>,
) -> Result<usize, StoreError> {
    let mut quarantined = 0usize;

    for watched in watched_dirs(config) {
        let Ok(mut entries) = tokio::fs::read_dir(&watched.dir).await else { continue };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
            let stem = if watched.label == "vault/data" {
                paths::vault_data_owner_stem(name)
            } else {
                FileStem::from_filename(name)
            };
            if store.get(&stem).is_some() {
                continue;
            }
            match quarantine(config, watched.label, &path).await {
                Ok(()) => {
                    quarantined += 1;
                    warn!(file = %name, dir = watched.label, "quarantined orphan artifact with no matching job");
                }
                Err(e) => warn!(file = %name, dir = watched.label, error = %e, "failed to quarantine orphan artifact"),
            }
        }
    }

    if quarantined > 0 {
        info!(quarantined, "startup reconciliation complete");
    }
    Ok(quarantined)
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Polls every watched inbox root — the configured `inbox_dir` plus any
//! `inbox_dir/remote_review/*` subdirectory spec.md §6.1 calls out — on a
//! fixed cadence and turns each stable file into a job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reelforge_adapters::{InboxWatcher, InboxWatcherConfig};
use reelforge_core::{Clock, Job, JobConfig, SystemClock};
use reelforge_store::Store;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

const EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "mpg", "mpeg", "mxf", "mp3", "wav", "m4a"];

fn watcher_config(config: &reelforge_core::OrchestratorConfig) -> InboxWatcherConfig {
    InboxWatcherConfig {
        extensions: EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        stability_probes: config.stability_probes,
        stability_delay: Duration::from_millis(config.stability_delay_ms),
        min_age: Duration::from_secs(config.min_age_seconds),
    }
}

/// `inbox_dir` itself, plus every subdirectory of `inbox_dir/remote_review/`
/// — one per in-flight remote-review handoff (spec.md §6.1).
async fn watched_roots(inbox_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![inbox_dir.to_path_buf()];
    let remote_review = inbox_dir.join("remote_review");
    if let Ok(mut entries) = tokio::fs::read_dir(&remote_review).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.path().is_dir() {
                roots.push(entry.path());
            }
        }
    }
    roots
}

#[instrument(skip(config, store))]
async fn scan_once(config: &reelforge_core::OrchestratorConfig, store: &Store<SystemClock>) {
    let watcher_config = watcher_config(config);
    for root in watched_roots(&config.inbox_dir).await {
        let watcher = InboxWatcher::new(root.clone(), watcher_config.clone());
        let stable = match watcher.scan(|stem| store.get(stem).is_some()).await {
            Ok(files) => files,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "inbox scan failed");
                continue;
            }
        };

        for file in stable {
            let now_ms = SystemClock.epoch_ms();
            let job_config = JobConfig {
                target_language: "en".to_string(),
                program_profile: "default".to_string(),
                subtitle_style: "default".to_string(),
            };
            let mut job = Job::new(file.file_stem.clone(), file.path.clone(), job_config, now_ms);
            job.meta.review_required = config.review_required_default;
            match store.create(job).await {
                Ok(created) => info!(
                    file_stem = %created.file_stem,
                    path = %file.path.display(),
                    "ingested new job"
                ),
                Err(e) => warn!(
                    file_stem = %file.file_stem,
                    error = %e,
                    "dropping duplicate inbox file (file_stem already known)"
                ),
            }
        }
    }
}

/// Run the inbox scan loop forever, every `config.poll_interval_ms`, until
/// `shutdown` is cancelled.
pub async fn run(config: Arc<reelforge_core::OrchestratorConfig>, store: Arc<Store<SystemClock>>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_millis(config.poll_interval_ms.max(1)));
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("inbox watcher shutting down");
                return;
            }
            _ = interval.tick() => {
                scan_once(&config, &store).await;
            }
        }
    }
}

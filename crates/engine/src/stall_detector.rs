// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Runs on its own slower cadence (default every 30 s), independent of
//! the per-second stage tick: scans for jobs whose stage has idled past
//! its configured threshold and either forces a retry or kills the job.
//! Never advances a stage forward — only retries in place or moves to
//! `Dead`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use reelforge_adapters::CloudBridge;
use reelforge_core::{ChangeSource, Clock, Job, JobEventKind, Stage};
use reelforge_store::{JobFilter, Store, StoreError};

use crate::cloud_link;
use crate::paths;

const DEFAULT_MAX_STALLS: u32 = 3;

pub struct StallDetector<C: Clock> {
    store: Arc<Store<C>>,
    cloud: Arc<CloudBridge>,
    objects: Arc<dyn reelforge_adapters::ObjectStore>,
    config: Arc<reelforge_core::OrchestratorConfig>,
    clock: C,
    /// Cancellation tokens for whatever in-flight LocalRunner invocation
    /// is (or was) running on behalf of a job, so a stall can cancel it
    /// cooperatively instead of racing the handler directly.
    cancellations: Arc<parking_lot::Mutex<std::collections::HashMap<reelforge_core::FileStem, CancellationToken>>>,
}

impl<C: Clock> StallDetector<C> {
    pub fn new(
        store: Arc<Store<C>>,
        cloud: Arc<CloudBridge>,
        objects: Arc<dyn reelforge_adapters::ObjectStore>,
        config: Arc<reelforge_core::OrchestratorConfig>,
        clock: C,
        cancellations: Arc<parking_lot::Mutex<std::collections::HashMap<reelforge_core::FileStem, CancellationToken>>>,
    ) -> Self {
        Self { store, cloud, objects, config, clock, cancellations }
    }

    /// One pass over every non-terminal job.
    pub async fn sweep(&self) -> Result<(), StoreError> {
        let now_ms = self.clock.epoch_ms();
        for job in self.store.list(&JobFilter::default()) {
            if job.stage.is_terminal() {
                continue;
            }
            let idle_ms = now_ms.saturating_sub(job.updated_at_ms);
            let threshold_ms = self.config.limits_for(job.stage).stall_seconds * 1_000;
            if idle_ms < threshold_ms {
                continue;
            }
            self.handle_stall(&job).await?;
        }
        Ok(())
    }

    async fn handle_stall(&self, job: &Job) -> Result<(), StoreError> {
        // Cancel whatever LocalRunner invocation is in flight for this job
        // before re-dispatching it, so a stalled subprocess doesn't keep
        // running alongside the retry.
        if let Some(token) = self.cancellations.lock().remove(&job.file_stem) {
            token.cancel();
        }

        if job.stage.is_cloud() {
            self.resubmit(job).await;
        }

        let stage = job.stage;
        let max_stalls = self.config.limits_for(stage).retry_budget.max(DEFAULT_MAX_STALLS);
        let dead_reason = if job.stage.is_cloud() { "cloud_stall".to_string() } else { format!("stall: {stage}") };
        self.store
            .update(&job.file_stem, ChangeSource::Engine, move |current, _now| {
                let current = current?;
                let stall_count = current.meta.stall_count(stage) + 1;
                if stall_count > max_stalls {
                    Some(JobEventKind::DeadWithReason { reason: dead_reason })
                } else {
                    Some(JobEventKind::StallRecorded { stage, reason: "recovering from stall".to_string() })
                }
            })
            .await?;
        Ok(())
    }

    /// For a stalled cloud stage with no local work, the recovery action
    /// is to resubmit under the same `cloud_job_id` rather than cancel
    /// anything local. `CloudBridge::submit` is idempotent against
    /// `cloud_job_id` (spec.md §4.4), so resubmitting under the link
    /// already on disk is safe even if the remote side is mid-run.
    async fn resubmit(&self, job: &Job) {
        let link_path = paths::cloud_link_path(&self.config, &job.file_stem);
        let Ok(Some(link)) = cloud_link::read(&link_path).await else { return };
        // A stalled poll with no progress.json at all means the approved
        // artifact may simply be missing; nothing to resubmit against if
        // the object store has no record of the job either.
        let marker = link.object_key("job.json");
        if !self.objects.exists(&marker).await {
            return;
        }

        let skeleton = paths::skeleton_path(&self.config, &job.file_stem);
        let source_uri = skeleton.to_string_lossy().into_owned();
        let target_languages = [job.config.target_language.clone()];
        let request = reelforge_adapters::SubmitRequest {
            file_stem: job.file_stem.as_str(),
            source_uri: &source_uri,
            target_languages: &target_languages,
        };
        let _ = self
            .cloud
            .submit(self.config.cloud_trigger, &request, &self.config.commands.cloud_trigger, &link.bucket, &link.prefix)
            .await;
    }
}

#[cfg(test)]
#[path = "stall_detector_tests.rs"]
mod tests;

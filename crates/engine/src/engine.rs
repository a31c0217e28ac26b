// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The `StageEngine` tick loop: once per `tick_interval_ms`, reconcile
//! every non-terminal job against the filesystem, then dispatch whatever
//! still needs a handler — bounded by each stage's configured
//! concurrency cap and ordered oldest-`updated_at` first, per spec.md
//! §4.5's fairness rule.
//!
//! Nothing here blocks on a handler directly: dispatching a job spawns a
//! task that runs [`handlers::dispatch`] to completion and reports back
//! on an mpsc channel, so the tick loop itself never waits on a
//! long-running subprocess or cloud poll. This is the tick-driven
//! scheduler spec.md §9's Design Notes calls for in place of the
//! original's long synchronous polling loops.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as SyncMutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use reelforge_core::{ChangeSource, Clock, FileStem, Job, JobEventKind, OrchestratorConfig, Stage, StageOutcome};
use reelforge_store::{JobFilter, Store, StoreError};

use crate::handlers::{self, HandlerCtx};
use crate::heartbeat::HeartbeatPublisher;
use crate::reconcile;

struct Completion {
    file_stem: FileStem,
    dispatched_stage: Stage,
    outcome: StageOutcome,
}

/// Per-job bookkeeping the engine needs across ticks: which jobs
/// currently have a dispatch task running, and the cancellation token
/// that task observes. Shared with [`crate::stall_detector::StallDetector`]
/// so a stall sweep can cancel the same in-flight work a `cancel`/`halt`
/// operator action would.
#[derive(Clone, Default)]
pub struct CancellationRegistry {
    tokens: Arc<SyncMutex<HashMap<FileStem, CancellationToken>>>,
}

impl CancellationRegistry {
    pub fn inner(&self) -> Arc<SyncMutex<HashMap<FileStem, CancellationToken>>> {
        self.tokens.clone()
    }

    fn register(&self, file_stem: FileStem) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.lock().insert(file_stem, token.clone());
        token
    }

    fn clear(&self, file_stem: &FileStem) {
        self.tokens.lock().remove(file_stem);
    }

    /// Cancel and drop the token for `file_stem`, if one is registered.
    /// Used directly by operator `cancel`/`halt` actions (spec.md §5).
    pub fn cancel(&self, file_stem: &FileStem) {
        if let Some(token) = self.tokens.lock().remove(file_stem) {
            token.cancel();
        }
    }
}

pub struct StageEngine<C: Clock> {
    store: Arc<Store<C>>,
    ctx: HandlerCtx<C>,
    config: Arc<OrchestratorConfig>,
    clock: C,
    heartbeat: HeartbeatPublisher,
    cancellations: CancellationRegistry,
    in_flight: Arc<SyncMutex<HashSet<FileStem>>>,
    /// Earliest epoch-ms a job that just hit [`StageOutcome::Retry`] may be
    /// re-dispatched, honoring the handler's requested backoff instead of
    /// retrying on the very next 1s tick.
    retry_not_before: Arc<SyncMutex<HashMap<FileStem, u64>>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<C: Clock + 'static> StageEngine<C> {
    pub fn new(store: Arc<Store<C>>, ctx: HandlerCtx<C>, config: Arc<OrchestratorConfig>, clock: C) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            heartbeat: HeartbeatPublisher::new(&config.work_dir),
            ctx,
            config,
            clock,
            cancellations: CancellationRegistry::default(),
            in_flight: Arc::new(SyncMutex::new(HashSet::new())),
            retry_not_before: Arc::new(SyncMutex::new(HashMap::new())),
            completions_tx,
            completions_rx,
        }
    }

    /// Shared handle for wiring into [`crate::stall_detector::StallDetector`]
    /// and the daemon's ControlAPI cancel/halt actions.
    pub fn cancellations(&self) -> CancellationRegistry {
        self.cancellations.clone()
    }

    pub fn heartbeat(&self) -> &HeartbeatPublisher {
        &self.heartbeat
    }

    /// Run one tick: publish a heartbeat, drain whatever dispatch tasks
    /// completed since the last tick, then dispatch every eligible job
    /// that isn't already in flight and isn't over its stage's
    /// concurrency cap.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) -> Result<(), StoreError> {
        let now_ms = self.clock.epoch_ms();
        if let Err(e) = self.heartbeat.publish(now_ms).await {
            warn!(error = %e, "failed to publish heartbeat");
        }

        self.drain_completions().await?;

        let mut jobs: Vec<Job> =
            self.store.list(&JobFilter::default()).into_iter().filter(|j| !j.stage.is_terminal()).collect();
        jobs.sort_by_key(|j| j.updated_at_ms);

        let mut stage_occupancy: HashMap<Stage, u32> = HashMap::new();
        {
            let in_flight = self.in_flight.lock();
            for stem in in_flight.iter() {
                if let Some(job) = jobs.iter().find(|j| &j.file_stem == stem) {
                    *stage_occupancy.entry(job.stage).or_default() += 1;
                }
            }
        }

        for job in jobs {
            if self.in_flight.lock().contains(&job.file_stem) {
                continue;
            }
            if let Some(&not_before) = self.retry_not_before.lock().get(&job.file_stem) {
                if now_ms < not_before {
                    continue;
                }
            }

            if let Some(outcome) = reconcile::check(&job, &self.ctx).await {
                self.apply_outcome(job.file_stem.clone(), job.stage, outcome).await?;
                continue;
            }

            let limits = self.config.limits_for(job.stage);
            let occupied = stage_occupancy.entry(job.stage).or_default();
            if *occupied >= limits.concurrency {
                if job.status != "waiting for slot" {
                    self.store
                        .update(&job.file_stem, ChangeSource::Engine, |_cur, _now| {
                            Some(JobEventKind::StatusUpdated { status: "waiting for slot".to_string() })
                        })
                        .await?;
                }
                continue;
            }
            *occupied += 1;

            self.dispatch_one(job);
        }

        Ok(())
    }

    fn dispatch_one(&self, job: Job) {
        let file_stem = job.file_stem.clone();
        let stage = job.stage;
        self.in_flight.lock().insert(file_stem.clone());
        let token = self.cancellations.register(file_stem.clone());

        let ctx = self.ctx.clone();
        let tx = self.completions_tx.clone();
        let in_flight = self.in_flight.clone();
        let cancellations = self.cancellations.clone();

        tokio::spawn(async move {
            let outcome = handlers::dispatch(&job, &ctx, &token).await;
            in_flight.lock().remove(&file_stem);
            cancellations.clear(&file_stem);
            let _ = tx.send(Completion { file_stem, dispatched_stage: stage, outcome });
        });
    }

    async fn drain_completions(&mut self) -> Result<(), StoreError> {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_outcome(completion.file_stem, completion.dispatched_stage, completion.outcome).await?;
        }
        Ok(())
    }

    /// Translate a [`StageOutcome`] into the `Store` mutation spec.md §9
    /// calls for: the engine alone decides retry-vs-dead, never the
    /// handler.
    async fn apply_outcome(
        &self,
        file_stem: FileStem,
        dispatched_stage: Stage,
        outcome: StageOutcome,
    ) -> Result<(), StoreError> {
        match outcome {
            StageOutcome::Wait => Ok(()),
            StageOutcome::Transition { next, status, meta } => {
                self.retry_not_before.lock().remove(&file_stem);

                // Applied as their own events, ahead of the transition
                // itself: both originate from the same remote artifact read
                // that decided this transition, not from the engine, so
                // they're recorded with `ChangeSource::Cloud` (the
                // operator-wins arbitration in `Job::set_review_required_by_cloud`
                // still applies on top of this).
                if let Some(report) = meta.editor_report {
                    self.store
                        .update(&file_stem, ChangeSource::Cloud, move |cur, _now| {
                            cur?;
                            Some(JobEventKind::EditorReportSet { report })
                        })
                        .await?;
                }
                if let Some(value) = meta.review_required {
                    self.store
                        .update(&file_stem, ChangeSource::Cloud, move |cur, _now| {
                            cur?;
                            Some(JobEventKind::ReviewRequiredSet { value })
                        })
                        .await?;
                }

                self.store
                    .update(&file_stem, ChangeSource::Engine, move |cur, _now| {
                        let cur = cur?;
                        if cur.stage != dispatched_stage {
                            // Stage moved out from under us (operator action
                            // raced the dispatch) — don't clobber it.
                            return None;
                        }
                        Some(JobEventKind::Transitioned { next, status })
                    })
                    .await?;
                info!(file_stem = %file_stem, next = %next, "stage transition");
                Ok(())
            }
            StageOutcome::Progress { percent, status } => {
                self.store
                    .update(&file_stem, ChangeSource::Engine, move |cur, _now| {
                        let cur = cur?;
                        if cur.stage != dispatched_stage {
                            return None;
                        }
                        Some(JobEventKind::ProgressReported { percent, status })
                    })
                    .await?;
                Ok(())
            }
            StageOutcome::Retry { reason, after } => {
                let retry_budget = self.config.limits_for(dispatched_stage).retry_budget;
                self.store
                    .update(&file_stem, ChangeSource::Engine, move |cur, _now| {
                        let cur = cur?;
                        if cur.stage != dispatched_stage {
                            return None;
                        }
                        if cur.meta.retry_count(dispatched_stage) + 1 > retry_budget {
                            Some(JobEventKind::DeadWithReason { reason })
                        } else {
                            Some(JobEventKind::RetryRecorded { stage: dispatched_stage, reason })
                        }
                    })
                    .await?;
                let not_before = self.clock.epoch_ms() + after.as_millis() as u64;
                self.retry_not_before.lock().insert(file_stem, not_before);
                Ok(())
            }
            StageOutcome::Fatal { reason } => {
                self.retry_not_before.lock().remove(&file_stem);
                self.store
                    .update(&file_stem, ChangeSource::Engine, move |cur, _now| {
                        let cur = cur?;
                        if cur.stage != dispatched_stage {
                            return None;
                        }
                        Some(JobEventKind::DeadWithReason { reason })
                    })
                    .await?;
                Ok(())
            }
        }
    }
}

/// Run the engine's tick loop forever at `tick_interval_ms`, until
/// `shutdown` is cancelled.
pub async fn run<C: Clock + 'static>(mut engine: StageEngine<C>, tick_interval: Duration, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(tick_interval);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("stage engine shutting down");
                return;
            }
            _ = interval.tick() => {
                if let Err(e) = engine.tick().await {
                    warn!(error = %e, "stage engine tick failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

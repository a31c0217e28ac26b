// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The shared state handed to every axum handler and background task —
//! the equivalent of the teacher's `ListenCtx`, adapted from a per-
//! connection Unix-socket context to an `axum::extract::State`.

use std::sync::Arc;

use reelforge_adapters::{CloudBridge, LocalObjectStore, LocalRunner, ObjectStore};
use reelforge_core::{OrchestratorConfig, SystemClock};
use reelforge_engine::{CancellationRegistry, HandlerCtx};
use reelforge_store::{Store, StoreError};

/// Shared daemon state: the durable `Store`, the dependencies stage
/// handlers need, and the cancellation registry operator actions and the
/// `StallDetector` both reach into. Cheap to clone — everything inside is
/// already behind an `Arc`.
#[derive(Clone)]
pub struct DaemonContext {
    pub config: Arc<OrchestratorConfig>,
    pub store: Arc<Store<SystemClock>>,
    pub handler_ctx: HandlerCtx<SystemClock>,
    pub cancellations: CancellationRegistry,
    pub clock: SystemClock,
}

impl DaemonContext {
    /// Open the Store at `<work_dir>/store/{snapshot.zst,jobs.wal}` and
    /// assemble every adapter a stage handler needs.
    pub async fn build(config: OrchestratorConfig) -> Result<Self, StoreError> {
        let config = Arc::new(config);
        let clock = SystemClock;

        let store_dir = config.work_dir.join("store");
        let store = Arc::new(
            Store::open(store_dir.join("snapshot.zst"), store_dir.join("jobs.wal"), clock.clone()).await?,
        );

        let local_runner = Arc::new(LocalRunner::new(num_cpus_hint()));
        let cloud = Arc::new(CloudBridge::new(config.cloud_api_base_url.clone().unwrap_or_default()));
        let objects: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(config.work_dir.join("cloud_objects")));

        let handler_ctx = HandlerCtx {
            config: config.clone(),
            local_runner,
            cloud,
            objects,
            clock: clock.clone(),
        };

        Ok(Self { config, store, handler_ctx, cancellations: CancellationRegistry::default(), clock })
    }
}

/// A conservative, dependency-free stand-in for `num_cpus::get()`: the
/// pack doesn't carry that crate, and the exact figure only bounds how
/// many subprocess slots `LocalRunner` hands out before `StageEngine`'s
/// own per-stage `concurrency` limits take over anyway.
fn num_cpus_hint() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Daemon startup: load configuration, open the Store, run orphan
//! reconciliation, then spawn every background task off one shared
//! shutdown token. Grounded in the teacher's `lifecycle::startup`
//! sequencing (create directories, recover state from snapshot + WAL
//! replay, reconcile orphans, *then* start accepting work), adapted from
//! a Unix-socket bind to spawning the axum ControlAPI's listener in
//! `main.rs` instead.

use std::time::Duration;

use reelforge_core::OrchestratorConfig;
use reelforge_store::StoreError;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::context::DaemonContext;
use crate::{checkpoint_task, inbox_task, orphan_reconcile, stall_task};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create working directories: {0}")]
    Directories(#[source] std::io::Error),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

/// Everything `main` needs after startup completes: the shared context to
/// build the ControlAPI router from, and the token that stops every
/// spawned background task (and the ControlAPI's own graceful shutdown)
/// when cancelled.
pub struct Bootstrapped {
    pub context: DaemonContext,
    pub shutdown: CancellationToken,
}

/// Load `config`, open the Store, run orphan reconciliation, then spawn
/// the inbox watcher, the stage engine tick loop, the stall sweep, and
/// the periodic checkpoint task. The returned context's `cancellations`
/// registry is the same one the spawned `StageEngine` dispatches with, so
/// a ControlAPI `cancel`/`halt` action reaches the same in-flight work a
/// stall recovery would.
pub async fn bootstrap(config: OrchestratorConfig) -> Result<Bootstrapped, StartupError> {
    tokio::fs::create_dir_all(&config.work_dir).await.map_err(StartupError::Directories)?;
    tokio::fs::create_dir_all(&config.inbox_dir).await.map_err(StartupError::Directories)?;
    tokio::fs::create_dir_all(&config.delivery_dir).await.map_err(StartupError::Directories)?;

    let mut context = DaemonContext::build(config).await?;

    let quarantined = orphan_reconcile::run(&context.config, &context.store).await?;
    info!(quarantined, "startup reconciliation complete");

    let shutdown = CancellationToken::new();

    let engine = reelforge_engine::StageEngine::new(
        context.store.clone(),
        context.handler_ctx.clone(),
        context.config.clone(),
        context.clock.clone(),
    );
    // The engine owns the authoritative cancellation registry; share it
    // back onto the context so ControlAPI actions cancel the same
    // in-flight work the stall detector would.
    context.cancellations = engine.cancellations();

    let tick_interval = Duration::from_millis(context.config.tick_interval_ms.max(1));
    tokio::spawn(reelforge_engine::run(engine, tick_interval, shutdown.clone()));

    let stall_detector = reelforge_engine::StallDetector::new(
        context.store.clone(),
        context.handler_ctx.cloud.clone(),
        context.handler_ctx.objects.clone(),
        context.config.clone(),
        context.clock.clone(),
        context.cancellations.inner(),
    );
    tokio::spawn(stall_task::run(stall_detector, shutdown.clone()));

    tokio::spawn(inbox_task::run(context.config.clone(), context.store.clone(), shutdown.clone()));
    tokio::spawn(checkpoint_task::run(context.store.clone(), shutdown.clone()));

    Ok(Bootstrapped { context, shutdown })
}

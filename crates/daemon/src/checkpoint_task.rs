// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Periodically compacts the WAL into a fresh snapshot, independent of
//! the per-tick stage engine — checkpointing on every write would make
//! every mutation pay a zstd-compression cost for no durability benefit,
//! since the WAL itself is already durable.

use std::sync::Arc;
use std::time::Duration;

use reelforge_core::SystemClock;
use reelforge_store::Store;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub async fn run(store: Arc<Store<SystemClock>>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(CHECKPOINT_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("checkpoint task shutting down, running a final checkpoint");
                if let Err(e) = store.checkpoint().await {
                    warn!(error = %e, "final checkpoint failed");
                }
                return;
            }
            _ = interval.tick() => {
                if let Err(e) = store.checkpoint().await {
                    warn!(error = %e, "periodic checkpoint failed");
                } else {
                    info!("checkpointed store");
                }
            }
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Runs `StallDetector::sweep` on its own slower cadence (default every
//! 30 s), independent of the per-second `StageEngine` tick.

use std::time::Duration;

use reelforge_core::SystemClock;
use reelforge_engine::StallDetector;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

pub async fn run(detector: StallDetector<SystemClock>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("stall detector shutting down");
                return;
            }
            _ = interval.tick() => {
                if let Err(e) = detector.sweep().await {
                    warn!(error = %e, "stall sweep failed");
                }
            }
        }
    }
}

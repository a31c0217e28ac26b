// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `GET /health` (spec.md §4.8): a liveness/capacity snapshot for an
//! external watchdog, distinct from the heartbeat files themselves.

use axum::extract::State;
use axum::Json;
use reelforge_core::Clock;
use reelforge_engine::HeartbeatPublisher;
use reelforge_store::JobFilter;
use reelforge_wire::HealthResponse;

use crate::context::DaemonContext;

pub async fn handle(State(ctx): State<DaemonContext>) -> Json<HealthResponse> {
    let now_ms = ctx.clock.epoch_ms();
    let heartbeat = HeartbeatPublisher::new(&ctx.config.work_dir);
    let orchestrator_heartbeat_age_ms =
        HeartbeatPublisher::age_ms(heartbeat.orchestrator_path(), now_ms).await;
    let control_api_heartbeat_age_ms =
        HeartbeatPublisher::age_ms(heartbeat.control_api_path(), now_ms).await;

    let active_job_count =
        ctx.store.list(&JobFilter::default()).into_iter().filter(|job| !job.stage.is_terminal()).count();

    Json(HealthResponse {
        storage_ready: true,
        orchestrator_heartbeat_age_ms,
        control_api_heartbeat_age_ms,
        free_disk_bytes: free_disk_bytes(),
        active_job_count,
        cloud_enabled: ctx.config.cloud_pipeline,
    })
}

/// Free disk space isn't surfaced: the stack carries no disk-usage crate
/// (`statvfs` needs a `nix` feature this workspace doesn't enable), and
/// guessing at it isn't worth pulling one in for a single optional field.
fn free_disk_bytes() -> Option<u64> {
    None
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;

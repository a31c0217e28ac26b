// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Body of `GET /health` (spec.md §4.8).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub storage_ready: bool,
    pub orchestrator_heartbeat_age_ms: Option<u64>,
    pub control_api_heartbeat_age_ms: Option<u64>,
    pub free_disk_bytes: Option<u64>,
    pub active_job_count: usize,
    pub cloud_enabled: bool,
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Wire-facing views of [`reelforge_core::Job`]. Kept separate from the
//! domain model so the HTTP response shape can evolve independently of
//! the WAL's event payloads.

use reelforge_core::{ErrorLogEntry, Job, JobConfig, Stage, StageTimelineEntry, StatusTimelineEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wall-clock time spent per stage plus retry/stall counters, derived
/// entirely from `JobMeta`'s existing timeline and counters — no separate
/// accounting path to keep in sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageMetrics {
    pub stage_wall_ms: HashMap<String, u64>,
    pub retry_counts: HashMap<String, u32>,
    pub stall_counts: HashMap<String, u32>,
}

impl UsageMetrics {
    pub fn from_job(job: &Job) -> Self {
        let mut stage_wall_ms: HashMap<String, u64> = HashMap::new();
        for entry in &job.meta.stage_timeline {
            let exited_at = entry.exited_at_ms.unwrap_or(job.updated_at_ms);
            let elapsed = exited_at.saturating_sub(entry.entered_at_ms);
            *stage_wall_ms.entry(entry.stage.to_string()).or_insert(0) += elapsed;
        }
        Self {
            stage_wall_ms,
            retry_counts: job.meta.retry_counts.clone(),
            stall_counts: job.meta.stall_counts.clone(),
        }
    }
}

/// One row of `GET /jobs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSummary {
    pub file_stem: String,
    pub stage: Stage,
    pub status: String,
    pub progress: u8,
    pub updated_at_ms: u64,
    pub target_language: String,
    pub review_required: bool,
    pub is_dead: bool,
}

impl JobSummary {
    pub fn from_job(job: &Job) -> Self {
        JobSummary {
            file_stem: job.file_stem.as_str().to_string(),
            stage: job.stage,
            status: job.status.clone(),
            progress: job.progress,
            updated_at_ms: job.updated_at_ms,
            target_language: job.config.target_language.clone(),
            review_required: job.meta.review_required,
            is_dead: job.stage == Stage::Dead,
        }
    }
}

/// Full body of `GET /jobs/{file_stem}`: the summary plus everything an
/// operator dashboard needs to render history and diagnose failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDetail {
    pub file_stem: String,
    pub stage: Stage,
    pub status: String,
    pub progress: u8,
    pub updated_at_ms: u64,
    pub config: JobConfig,
    pub review_required: bool,
    pub dead_reason: Option<String>,
    pub stage_timeline: Vec<StageTimelineEntry>,
    pub status_timeline: Vec<StatusTimelineEntry>,
    pub error_log: Vec<ErrorLogEntry>,
    pub cloud_job_id: Option<String>,
    pub final_output_path: Option<String>,
    pub usage: UsageMetrics,
}

impl JobDetail {
    pub fn from_job(job: &Job) -> Self {
        JobDetail {
            file_stem: job.file_stem.as_str().to_string(),
            stage: job.stage,
            status: job.status.clone(),
            progress: job.progress,
            updated_at_ms: job.updated_at_ms,
            config: job.config.clone(),
            review_required: job.meta.review_required,
            dead_reason: job.meta.dead_reason.clone(),
            stage_timeline: job.meta.stage_timeline.clone(),
            status_timeline: job.meta.status_timeline.clone(),
            error_log: job.meta.error_log.clone(),
            cloud_job_id: job.meta.cloud_job_id.clone(),
            final_output_path: job.meta.final_output_path.as_ref().map(|p| p.to_string_lossy().into_owned()),
            usage: UsageMetrics::from_job(job),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

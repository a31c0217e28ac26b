// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The `Job` aggregate — the central unit of orchestrator state.

use crate::file_stem::FileStem;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bound on the in-memory status and error-log rings.
pub const STATUS_TIMELINE_CAP: usize = 50;
pub const ERROR_LOG_CAP: usize = 20;

/// One entry of the ordered stage timeline (`meta.stage_timeline`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimelineEntry {
    pub stage: Stage,
    pub entered_at_ms: u64,
    pub exited_at_ms: Option<u64>,
}

/// One entry of the bounded status-string ring (`meta.status_timeline`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimelineEntry {
    pub status: String,
    pub at_ms: u64,
}

/// One entry of the bounded structured error ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub stage: Stage,
    pub reason: String,
    pub at_ms: u64,
}

/// Opaque cloud-worker progress subdocument, mirrored verbatim from
/// `progress.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudProgress {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub segments_done: Option<u32>,
    #[serde(default)]
    pub segments_total: Option<u32>,
}

/// Structured, typed portion of `Job::meta`, plus a pass-through bag for
/// collaborator-owned keys the orchestrator doesn't interpret: these are
/// validated on read and preserved verbatim on write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMeta {
    #[serde(default)]
    pub stage_timeline: Vec<StageTimelineEntry>,
    #[serde(default)]
    pub status_timeline: Vec<StatusTimelineEntry>,
    pub source_path: Option<PathBuf>,
    pub original_filename: Option<String>,

    pub cloud_job_id: Option<String>,
    pub cloud_bucket: Option<String>,
    pub cloud_prefix: Option<String>,
    pub cloud_execution_id: Option<String>,
    #[serde(default)]
    pub cloud_progress: CloudProgress,

    #[serde(default)]
    pub halted: bool,
    /// The stage pointer at the moment of halt, restored by `resume`.
    pub prior_stage: Option<Stage>,

    #[serde(default)]
    pub review_required: bool,
    /// Set once an operator action has touched `review_required`; after
    /// that, cloud-sourced updates to the flag are ignored (DESIGN.md Open
    /// Question decision 2).
    #[serde(default)]
    pub review_locked_by_operator: bool,

    pub final_output_path: Option<PathBuf>,
    #[serde(default)]
    pub qa_metrics: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub error_log: Vec<ErrorLogEntry>,

    /// Per-stage retry counters, keyed by the stage's display name.
    #[serde(default)]
    pub retry_counts: std::collections::HashMap<String, u32>,
    /// Per-stage stall counters.
    #[serde(default)]
    pub stall_counts: std::collections::HashMap<String, u32>,
    pub dead_reason: Option<String>,

    /// Collaborator-owned fields not interpreted by the orchestrator.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobMeta {
    pub fn push_status(&mut self, status: impl Into<String>, now_ms: u64) {
        self.status_timeline.push(StatusTimelineEntry { status: status.into(), at_ms: now_ms });
        if self.status_timeline.len() > STATUS_TIMELINE_CAP {
            let overflow = self.status_timeline.len() - STATUS_TIMELINE_CAP;
            self.status_timeline.drain(0..overflow);
        }
    }

    pub fn push_error(&mut self, stage: Stage, reason: impl Into<String>, now_ms: u64) {
        self.error_log.push(ErrorLogEntry { stage, reason: reason.into(), at_ms: now_ms });
        if self.error_log.len() > ERROR_LOG_CAP {
            let overflow = self.error_log.len() - ERROR_LOG_CAP;
            self.error_log.drain(0..overflow);
        }
    }

    /// Close out the current open timeline entry (if any) and open a new one
    /// for `stage`. Every enter-stage event gets a matching exit-stage
    /// event before the next enter-stage event.
    pub fn enter_stage(&mut self, stage: Stage, now_ms: u64) {
        if let Some(last) = self.stage_timeline.last_mut() {
            if last.exited_at_ms.is_none() {
                last.exited_at_ms = Some(now_ms);
            }
        }
        self.stage_timeline.push(StageTimelineEntry { stage, entered_at_ms: now_ms, exited_at_ms: None });
    }

    pub fn retry_count(&self, stage: Stage) -> u32 {
        self.retry_counts.get(stage.to_string().as_str()).copied().unwrap_or(0)
    }

    pub fn increment_retry(&mut self, stage: Stage) -> u32 {
        let counter = self.retry_counts.entry(stage.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn reset_retry(&mut self, stage: Stage) {
        self.retry_counts.remove(stage.to_string().as_str());
    }

    pub fn stall_count(&self, stage: Stage) -> u32 {
        self.stall_counts.get(stage.to_string().as_str()).copied().unwrap_or(0)
    }

    pub fn increment_stall(&mut self, stage: Stage) -> u32 {
        let counter = self.stall_counts.entry(stage.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Job-creation-time configuration, immutable thereafter except by explicit
/// operator action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub target_language: String,
    pub program_profile: String,
    pub subtitle_style: String,
}

crate::builder! {
    pub struct JobConfigBuilder => JobConfig {
        into {
            target_language: String = "en",
            program_profile: String = "default",
            subtitle_style: String = "default",
        }
    }
}

/// The central unit of work: one media file moving through the stage
/// machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub file_stem: FileStem,
    pub stage: Stage,
    pub status: String,
    pub progress: u8,
    pub updated_at_ms: u64,
    pub config: JobConfig,
    #[serde(default)]
    pub meta: JobMeta,
    pub editor_report: Option<serde_json::Value>,
}

impl Job {
    /// Construct a freshly-ingested job: stage = Ingest, status = "queued".
    pub fn new(file_stem: FileStem, source_path: PathBuf, config: JobConfig, now_ms: u64) -> Self {
        let mut meta = JobMeta { source_path: Some(source_path), ..Default::default() };
        meta.enter_stage(Stage::Ingest, now_ms);
        Self {
            file_stem,
            stage: Stage::Ingest,
            status: "queued".to_string(),
            progress: 0,
            updated_at_ms: now_ms,
            config,
            meta,
            editor_report: None,
        }
    }

    /// Transition to `next`. Progress resets to 0 on stage entry.
    pub fn transition(&mut self, next: Stage, status: impl Into<String>, now_ms: u64) {
        self.meta.enter_stage(next, now_ms);
        self.stage = next;
        self.progress = 0;
        self.set_status(status, now_ms);
    }

    pub fn set_status(&mut self, status: impl Into<String>, now_ms: u64) {
        let status = status.into();
        self.meta.push_status(status.clone(), now_ms);
        self.status = status;
        self.updated_at_ms = self.updated_at_ms.max(now_ms);
    }

    /// Set progress, clamped to `[0, 100]`.
    pub fn set_progress(&mut self, progress: u32, now_ms: u64) {
        self.progress = progress.min(100) as u8;
        self.updated_at_ms = self.updated_at_ms.max(now_ms);
    }

    pub fn halt(&mut self, now_ms: u64) {
        if self.stage == Stage::Halted {
            return;
        }
        self.meta.prior_stage = Some(self.stage);
        self.meta.halted = true;
        self.transition(Stage::Halted, "halted by operator", now_ms);
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.stage != Stage::Halted {
            return;
        }
        let restore = self.meta.prior_stage.take().unwrap_or(Stage::Ingest);
        self.meta.halted = false;
        self.transition(restore, "resumed by operator", now_ms);
    }

    pub fn to_dead(&mut self, reason: impl Into<String>, now_ms: u64) {
        let reason = reason.into();
        self.meta.dead_reason = Some(reason.clone());
        self.meta.push_error(self.stage, reason.clone(), now_ms);
        self.transition(Stage::Dead, format!("dead: {reason}"), now_ms);
    }

    /// Operator-sourced update to `review_required`. Always wins over a
    /// subsequent cloud-sourced update (DESIGN.md Open Question decision 2).
    pub fn set_review_required_by_operator(&mut self, value: bool) {
        self.meta.review_required = value;
        self.meta.review_locked_by_operator = true;
    }

    /// Cloud-worker-sourced update to `review_required`. Ignored once an
    /// operator has locked the field.
    pub fn set_review_required_by_cloud(&mut self, value: bool) {
        if !self.meta.review_locked_by_operator {
            self.meta.review_required = value;
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        into { file_stem: FileStem = FileStem::from("test_job"), status: String = "queued" }
        set { stage: Stage = Stage::Ingest, progress: u8 = 0, updated_at_ms: u64 = 0, config: JobConfig = JobConfig::builder().build(), meta: JobMeta = JobMeta::default() }
        option { editor_report: serde_json::Value = None }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

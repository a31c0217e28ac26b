// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Job event handlers: one `JobEventKind` variant → one state mutation.

use reelforge_core::{JobEvent, JobEventKind};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &JobEvent) {
    let key = event.file_stem.as_str();

    match &event.kind {
        JobEventKind::Created { job } => {
            // Whole-row event: insertion is naturally idempotent, since the
            // event always carries the complete row as it looked at create
            // time, and uniqueness is enforced upstream by Store::create.
            state.jobs.entry(key.to_string()).or_insert_with(|| (**job).clone());
        }

        JobEventKind::Transitioned { next, status } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.transition(*next, status.clone(), event.at_ms);
            }
        }

        JobEventKind::ProgressUpdated { percent } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.set_progress(u32::from(*percent), event.at_ms);
            }
        }

        JobEventKind::ProgressReported { percent, status } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.set_progress(u32::from(*percent), event.at_ms);
                job.set_status(status.clone(), event.at_ms);
            }
        }

        JobEventKind::StatusUpdated { status } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.set_status(status.clone(), event.at_ms);
            }
        }

        JobEventKind::ReviewRequiredSet { value } => {
            if let Some(job) = state.jobs.get_mut(key) {
                match event.source {
                    reelforge_core::ChangeSource::Operator => {
                        job.set_review_required_by_operator(*value)
                    }
                    _ => job.set_review_required_by_cloud(*value),
                }
            }
        }

        JobEventKind::EditorReportSet { report } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.editor_report = Some(report.clone());
                job.updated_at_ms = job.updated_at_ms.max(event.at_ms);
            }
        }

        JobEventKind::Halted => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.halt(event.at_ms);
            }
        }

        JobEventKind::Resumed => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.resume(event.at_ms);
            }
        }

        JobEventKind::DeadWithReason { reason } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.to_dead(reason.clone(), event.at_ms);
            }
        }

        JobEventKind::MetaMerged { patch } => {
            if let Some(job) = state.jobs.get_mut(key) {
                for (k, v) in patch {
                    job.meta.extra.insert(k.clone(), v.clone());
                }
                job.updated_at_ms = job.updated_at_ms.max(event.at_ms);
            }
        }

        JobEventKind::RetryRecorded { stage, reason } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.meta.increment_retry(*stage);
                job.set_status(reason.clone(), event.at_ms);
            }
        }

        JobEventKind::StallRecorded { stage, reason } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.meta.increment_stall(*stage);
                job.set_status(reason.clone(), event.at_ms);
            }
        }

        JobEventKind::Retried { stage } => {
            if let Some(job) = state.jobs.get_mut(key) {
                job.meta.reset_retry(*stage);
                job.meta.dead_reason = None;
                job.transition(*stage, "retried by operator", event.at_ms);
            }
        }

        JobEventKind::Deleted => {
            state.jobs.remove(key);
        }
    }
}

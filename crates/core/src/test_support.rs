// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{ChangeSource, JobEvent, JobEventKind};
use crate::file_stem::FileStem;
use crate::job::Job;
use crate::stage::Stage;

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::stage::Stage;
    use proptest::prelude::*;

    pub fn arb_stage() -> impl Strategy<Value = Stage> {
        prop_oneof![
            Just(Stage::Ingest),
            Just(Stage::Transcribing),
            Just(Stage::Transcribed),
            Just(Stage::TranslatingCloudSubmitted),
            Just(Stage::CloudTranslating),
            Just(Stage::CloudReviewing),
            Just(Stage::CloudPolishing),
            Just(Stage::CloudDone),
            Just(Stage::Reviewing),
            Just(Stage::Reviewed),
            Just(Stage::Finalizing),
            Just(Stage::Finalized),
            Just(Stage::Burning),
            Just(Stage::Completed),
            Just(Stage::Delivered),
            Just(Stage::Dead),
            Just(Stage::Halted),
        ]
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn created_event(stem: &str, job: Job, at_ms: u64) -> JobEvent {
    JobEvent {
        file_stem: FileStem::from(stem),
        source: ChangeSource::Engine,
        at_ms,
        kind: JobEventKind::Created { job: Box::new(job) },
    }
}

pub fn transitioned_event(stem: &str, stage: Stage, status: &str, at_ms: u64) -> JobEvent {
    JobEvent {
        file_stem: FileStem::from(stem),
        source: ChangeSource::Engine,
        at_ms,
        kind: JobEventKind::Transitioned { next: stage, status: status.to_string() },
    }
}

pub fn progress_event(stem: &str, percent: u8, at_ms: u64) -> JobEvent {
    JobEvent {
        file_stem: FileStem::from(stem),
        source: ChangeSource::Engine,
        at_ms,
        kind: JobEventKind::ProgressUpdated { percent },
    }
}

pub fn operator_halt_event(stem: &str, at_ms: u64) -> JobEvent {
    JobEvent { file_stem: FileStem::from(stem), source: ChangeSource::Operator, at_ms, kind: JobEventKind::Halted }
}

pub fn operator_resume_event(stem: &str, at_ms: u64) -> JobEvent {
    JobEvent { file_stem: FileStem::from(stem), source: ChangeSource::Operator, at_ms, kind: JobEventKind::Resumed }
}

pub fn dead_event(stem: &str, reason: &str, at_ms: u64) -> JobEvent {
    JobEvent {
        file_stem: FileStem::from(stem),
        source: ChangeSource::Engine,
        at_ms,
        kind: JobEventKind::DeadWithReason { reason: reason.to_string() },
    }
}

pub fn cloud_review_required_event(stem: &str, value: bool, at_ms: u64) -> JobEvent {
    JobEvent {
        file_stem: FileStem::from(stem),
        source: ChangeSource::Cloud,
        at_ms,
        kind: JobEventKind::ReviewRequiredSet { value },
    }
}

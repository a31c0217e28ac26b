// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The result a stage handler hands back to the engine, instead of using
//! control-flow exceptions.

use crate::stage::Stage;
use std::time::Duration;

/// Side-channel job fields a [`StageOutcome::Transition`] may carry
/// alongside the stage change itself, for the one or two handlers that
/// learn something about the job from the same artifact read that decided
/// the transition (e.g. `CloudDone` fetching `editor_report.json` in the
/// same round-trip that decides whether to enter `Reviewing`). `None`
/// means "leave this field as it is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaPatch {
    pub editor_report: Option<serde_json::Value>,
    pub review_required: Option<bool>,
}

/// What a stage handler decided should happen to a job, returned as data
/// rather than thrown. The engine interprets this and applies the
/// corresponding `Job`/`Event` mutation; handlers never touch the store
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The stage's work finished; advance to `next` with the given status.
    Transition { next: Stage, status: String, meta: MetaPatch },
    /// Progress update without a stage change (e.g. transcription percent).
    Progress { percent: u8, status: String },
    /// Transient failure; retry after `after` if under the stage's retry
    /// budget, otherwise the engine converts this to `Fatal`.
    Retry { reason: String, after: Duration },
    /// Unrecoverable failure; the engine moves the job to `Stage::Dead`.
    Fatal { reason: String },
    /// Nothing to do this tick (e.g. waiting on a cloud worker's
    /// `progress.json`); check again on the next poll interval.
    Wait,
}

impl StageOutcome {
    pub fn transition(next: Stage, status: impl Into<String>) -> Self {
        Self::Transition { next, status: status.into(), meta: MetaPatch::default() }
    }

    /// Same as [`Self::transition`], but also carries a [`MetaPatch`] the
    /// engine applies (as its own durable events) alongside the stage
    /// change.
    pub fn transition_with_meta(next: Stage, status: impl Into<String>, meta: MetaPatch) -> Self {
        Self::Transition { next, status: status.into(), meta }
    }

    pub fn progress(percent: u8, status: impl Into<String>) -> Self {
        Self::Progress { percent: percent.min(100), status: status.into() }
    }

    pub fn retry(reason: impl Into<String>, after: Duration) -> Self {
        Self::Retry { reason: reason.into(), after }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal { reason: reason.into() }
    }
}

#[cfg(test)]
#[path = "stage_outcome_tests.rs"]
mod tests;

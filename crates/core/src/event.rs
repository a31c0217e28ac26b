// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Events: the durable record the Store's WAL persists and the ChangeFeed
//! fans out.

use crate::file_stem::FileStem;
use crate::job::Job;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Who originated a mutation. Used to arbitrate conflicting writers — e.g.
/// an operator's `review_required` override always wins over a later
/// cloud-sourced update (DESIGN.md Open Question decision 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// The local stage engine acting on a handler's `StageOutcome`.
    Engine,
    /// An operator action via the ControlAPI.
    Operator,
    /// A mirrored update from a remote cloud worker's `progress.json`.
    Cloud,
    /// Startup reconciliation.
    Reconcile,
}

crate::simple_display! {
    ChangeSource {
        Engine => "engine",
        Operator => "operator",
        Cloud => "cloud",
        Reconcile => "reconcile",
    }
}

/// The WAL's unit of durability: one mutation to one job's row, tagged with
/// its source for downstream arbitration: every mutation is the result
/// of exactly one committed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub file_stem: FileStem,
    pub source: ChangeSource,
    pub at_ms: u64,
    pub kind: JobEventKind,
}

/// The mutation payload. `Created` and `Deleted` are whole-row events;
/// everything else mutates a field of an existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobEventKind {
    Created { job: Box<Job> },
    Transitioned { next: Stage, status: String },
    ProgressUpdated { percent: u8 },
    /// A cloud poll reported both a progress percentage and a status
    /// string in the same `progress.json` read; applied as one mutation
    /// so a reader never observes the percent updated but not the status.
    ProgressReported { percent: u8, status: String },
    StatusUpdated { status: String },
    ReviewRequiredSet { value: bool },
    /// The cloud editor step's quality report landed (`editor_report.json`,
    /// spec.md §3/§6.4). Always cloud-sourced.
    EditorReportSet { report: serde_json::Value },
    Halted,
    Resumed,
    DeadWithReason { reason: String },
    MetaMerged { patch: serde_json::Map<String, serde_json::Value> },
    /// A stage handler reported a transient failure: bump that stage's
    /// retry counter and record the reason, without changing `stage`.
    RetryRecorded { stage: Stage, reason: String },
    /// A stage's idle threshold was breached: bump that stage's stall
    /// counter, without changing `stage`.
    StallRecorded { stage: Stage, reason: String },
    /// An operator `retry` action: clears `stage`'s retry counter and
    /// `dead_reason`, then re-enters `stage`. The caller (ControlAPI)
    /// computes which stage to retry into — the stage a `Dead` job last
    /// occupied, or the job's current stage otherwise.
    Retried { stage: Stage },
    Deleted,
}

/// What the ChangeFeed broadcasts to `GET /jobs/stream` subscribers.
/// Distinct from [`JobEvent`]: this is a read-model snapshot, not a
/// replayable WAL entry — subscribers never see a coalesced event disagree
/// with the WAL's order of record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub file_stem: FileStem,
    pub at_ms: u64,
    pub job: Job,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

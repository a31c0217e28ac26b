// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The per-job stage state machine.

use serde::{Deserialize, Serialize};

/// A node in the per-job state machine.
///
/// `TranslatingCloudSubmitted` and `CloudTranslating` are kept as distinct
/// adjacent stages rather than collapsed into one name — see
/// `DESIGN.md`'s Open Question decision 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Transcribing,
    Transcribed,
    TranslatingCloudSubmitted,
    CloudTranslating,
    CloudReviewing,
    CloudPolishing,
    CloudDone,
    Reviewing,
    Reviewed,
    Finalizing,
    Finalized,
    Burning,
    Completed,
    Delivered,
    /// Terminal failure sink.
    Dead,
    /// Operator halt; the stage pointer at halt time is preserved in
    /// `JobMeta::prior_stage` so `resume` can re-enter it.
    Halted,
}

crate::simple_display! {
    Stage {
        Ingest => "ingest",
        Transcribing => "transcribing",
        Transcribed => "transcribed",
        TranslatingCloudSubmitted => "translating_cloud_submitted",
        CloudTranslating => "cloud_translating",
        CloudReviewing => "cloud_reviewing",
        CloudPolishing => "cloud_polishing",
        CloudDone => "cloud_done",
        Reviewing => "reviewing",
        Reviewed => "reviewed",
        Finalizing => "finalizing",
        Finalized => "finalized",
        Burning => "burning",
        Completed => "completed",
        Delivered => "delivered",
        Dead => "dead",
        Halted => "halted",
    }
}

impl Stage {
    /// Stages from which the orchestrator no longer drives transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Delivered | Stage::Dead | Stage::Halted)
    }

    /// Whether this stage's progress is mirrored from a remote worker's
    /// `progress.json` rather than driven by a local handler.
    pub fn is_cloud(self) -> bool {
        matches!(
            self,
            Stage::TranslatingCloudSubmitted
                | Stage::CloudTranslating
                | Stage::CloudReviewing
                | Stage::CloudPolishing
        )
    }

    /// The edges of the state machine, in canonical traversal order.
    /// `Reviewing`/`Reviewed` are only traversed when `review_required` is
    /// set; every stage may also transition directly to `Dead` or `Halted`,
    /// which is not encoded here (checked separately by the engine).
    pub fn next(self) -> Option<Stage> {
        use Stage::*;
        match self {
            Ingest => Some(Transcribing),
            Transcribing => Some(Transcribed),
            Transcribed => Some(TranslatingCloudSubmitted),
            TranslatingCloudSubmitted => Some(CloudTranslating),
            CloudTranslating => Some(CloudReviewing),
            CloudReviewing => Some(CloudPolishing),
            CloudPolishing => Some(CloudDone),
            CloudDone => Some(Finalizing),
            Reviewing => Some(Reviewed),
            Reviewed => Some(Finalizing),
            Finalizing => Some(Finalized),
            Finalized => Some(Burning),
            Burning => Some(Completed),
            Completed | Delivered | Dead | Halted => None,
        }
    }

    /// Parse a cloud-reported stage name (from `progress.json`'s `stage`
    /// field) into the canonical local `Stage`. Unrecognized names return
    /// `None`; the caller should log and leave the local stage untouched
    /// rather than fail the job: a cloud worker's progress file can
    /// disappear transiently, and that must be treated as not-ready rather
    /// than a permanent error.
    pub fn mirror_cloud(name: &str) -> Option<Stage> {
        use Stage::*;
        match name {
            "translating" | "cloud_translating" => Some(CloudTranslating),
            "reviewing" | "cloud_reviewing" => Some(CloudReviewing),
            "polishing" | "cloud_polishing" => Some(CloudPolishing),
            "done" | "cloud_done" => Some(CloudDone),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;

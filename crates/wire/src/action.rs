// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The `POST /action` body: one tagged enum per spec.md §4.8's fixed
//! action set, mirroring the teacher's `Query`/`Response` tagged-enum
//! idiom for its own request surface.

use reelforge_core::Stage;
use serde::{Deserialize, Serialize};

/// An operator action against a single job, addressed by `file_stem`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Reset the current stage's retry counter and re-enter it.
    Retry { file_stem: String },
    /// Cancel in-flight work for the job; stage does not change.
    Cancel { file_stem: String },
    /// Halt the job; the current stage is preserved for `resume`.
    Halt { file_stem: String },
    /// Resume a halted job back into its preserved stage.
    Resume { file_stem: String },
    /// Re-invoke the burn step even though a delivery file already exists.
    ReBurn { file_stem: String },
    /// Mark a completed job as delivered without re-running anything.
    MarkDelivered { file_stem: String },
    /// Permanently remove the job record.
    Delete { file_stem: String },
    /// Force the job's stage pointer directly, bypassing the normal edges.
    ForceStage { file_stem: String, stage: Stage },
}

impl Action {
    pub fn file_stem(&self) -> &str {
        match self {
            Action::Retry { file_stem }
            | Action::Cancel { file_stem }
            | Action::Halt { file_stem }
            | Action::Resume { file_stem }
            | Action::ReBurn { file_stem }
            | Action::MarkDelivered { file_stem }
            | Action::Delete { file_stem }
            | Action::ForceStage { file_stem, .. } => file_stem,
        }
    }
}

/// Body of a successful `POST /action` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionAccepted {
    pub file_stem: String,
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;

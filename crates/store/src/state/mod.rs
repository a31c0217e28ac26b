// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Materialized state built by replaying [`JobEvent`]s.

mod jobs;

use reelforge_core::{FileStem, Job, JobEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The Store's in-memory read model: one row per `file_stem`, derived
/// entirely from the WAL. Rebuilding this from a snapshot + WAL replay must
/// yield byte-for-byte the same state as the original run, so a restart
/// never silently drops or duplicates a job's history.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub jobs: HashMap<String, Job>,
}

impl MaterializedState {
    pub fn get(&self, file_stem: &FileStem) -> Option<&Job> {
        self.jobs.get(file_stem.as_str())
    }

    pub fn contains(&self, file_stem: &FileStem) -> bool {
        self.jobs.contains_key(file_stem.as_str())
    }

    /// Apply one event to derive the next state. Every handler here must be
    /// idempotent: the same event applied twice leaves state unchanged the
    /// second time, since WAL replay after a crash mid-checkpoint may
    /// re-apply entries already reflected in a loaded snapshot.
    pub fn apply_event(&mut self, event: &JobEvent) {
        jobs::apply(self, event);
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

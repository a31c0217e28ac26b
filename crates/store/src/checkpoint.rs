// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Startup recovery and periodic checkpointing: load the newest snapshot,
//! replay the WAL entries committed after it, and — on a schedule —
//! compact the WAL back down to nothing by writing a fresh snapshot.

use crate::snapshot::{self, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Wal(#[from] WalError),
}

pub struct Checkpointer {
    snapshot_path: PathBuf,
}

impl Checkpointer {
    pub fn new(snapshot_path: PathBuf) -> Self {
        Self { snapshot_path }
    }

    /// Recover: load the last snapshot (if any), open the WAL seeded at the
    /// snapshot's sequence number, and replay everything committed after
    /// it. Returns the reconstructed state and the open WAL, ready for
    /// further appends.
    pub fn recover(&self, wal_path: &Path) -> Result<(MaterializedState, Wal), CheckpointError> {
        let snapshot = snapshot::load_snapshot(&self.snapshot_path)?;
        let (mut state, processed_seq) = match snapshot {
            Some(s) => (s.state, s.seq),
            None => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(wal_path, processed_seq)?;
        for entry in wal.replay_unprocessed()? {
            state.apply_event(&entry.event);
        }
        let mut wal = wal;
        wal.mark_processed(wal.write_seq());
        Ok((state, wal))
    }

    /// Write a fresh snapshot at the WAL's current sequence number, then
    /// truncate the WAL — the snapshot now durably captures everything the
    /// truncated entries held.
    pub fn checkpoint(
        &self,
        state: &MaterializedState,
        wal: &mut Wal,
    ) -> Result<(), CheckpointError> {
        let snapshot = Snapshot {
            version: CURRENT_SNAPSHOT_VERSION,
            seq: wal.write_seq(),
            state: state.clone(),
            created_at: chrono::Utc::now(),
        };
        snapshot::write_snapshot(&self.snapshot_path, &snapshot)?;
        wal.mark_processed(wal.write_seq());
        wal.truncate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;

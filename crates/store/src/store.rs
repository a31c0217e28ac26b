// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The Store facade: single source of truth for job records. Combines
//! the WAL, the materialized state, and the change feed behind one API
//! so callers never touch persistence directly.

use crate::change_feed::{ChangeFeed, Subscription};
use crate::checkpoint::{CheckpointError, Checkpointer};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use parking_lot::{Mutex as SyncMutex, RwLock};
use reelforge_core::{ChangeNotification, ChangeSource, Clock, FileStem, Job, JobError, JobEvent, JobEventKind};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Job(#[from] JobError),
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("row for {0} vanished immediately after applying its own event")]
    RowVanished(FileStem),
}

/// Filter for `Store::list`.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub stage: Option<reelforge_core::Stage>,
    pub status_substring: Option<String>,
    pub updated_after_ms: Option<u64>,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        if let Some(stage) = self.stage {
            if job.stage != stage {
                return false;
            }
        }
        if let Some(needle) = &self.status_substring {
            if !job.status.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(after) = self.updated_after_ms {
            if job.updated_at_ms < after {
                return false;
            }
        }
        true
    }
}

/// Per-`file_stem` serialization: writers to the same job queue behind the
/// same mutex, writers to different jobs proceed concurrently up to the
/// WAL append itself.
#[derive(Default)]
struct RowLocks {
    locks: SyncMutex<HashMap<FileStem, Arc<AsyncMutex<()>>>>,
}

impl RowLocks {
    fn get(&self, file_stem: &FileStem) -> Arc<AsyncMutex<()>> {
        self.locks.lock().entry(file_stem.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }
}

pub struct Store<C: Clock> {
    state: Arc<RwLock<MaterializedState>>,
    wal: Arc<AsyncMutex<Wal>>,
    row_locks: Arc<RowLocks>,
    change_feed: ChangeFeed,
    checkpointer: Checkpointer,
    clock: C,
}

impl<C: Clock> Store<C> {
    /// Recover from `snapshot_path`/`wal_path` (replaying any WAL entries
    /// committed after the last snapshot) and open for business.
    pub async fn open(snapshot_path: PathBuf, wal_path: PathBuf, clock: C) -> Result<Self, StoreError> {
        let checkpointer = Checkpointer::new(snapshot_path);
        let (state, wal) = checkpointer.recover(&wal_path)?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            wal: Arc::new(AsyncMutex::new(wal)),
            row_locks: Arc::new(RowLocks::default()),
            change_feed: ChangeFeed::default(),
            checkpointer,
            clock,
        })
    }

    pub fn subscribe(&self, queue_depth: usize) -> Subscription {
        self.change_feed.subscribe(queue_depth)
    }

    /// Snapshot-consistent read; never blocks on an in-flight writer past
    /// the brief state-lock hold.
    pub fn get(&self, file_stem: &FileStem) -> Option<Job> {
        self.state.read().get(file_stem).cloned()
    }

    pub fn list(&self, filter: &JobFilter) -> Vec<Job> {
        self.state.read().jobs.values().filter(|j| filter.matches(j)).cloned().collect()
    }

    pub async fn create(&self, job: Job) -> Result<Job, StoreError> {
        let file_stem = job.file_stem.clone();
        let _row_guard = self.row_locks.get(&file_stem).lock_owned().await;

        if self.state.read().contains(&file_stem) {
            return Err(StoreError::Job(JobError::AlreadyExists(file_stem)));
        }

        let now_ms = self.clock.epoch_ms();
        let event = JobEvent {
            file_stem: file_stem.clone(),
            source: ChangeSource::Engine,
            at_ms: now_ms,
            kind: JobEventKind::Created { job: Box::new(job) },
        };
        self.commit(event).await
    }

    /// Apply `f` under the row lock for `file_stem`. `f` observes the
    /// current job (or `None` if it doesn't exist yet) and the commit
    /// timestamp, and returns the event to record — or `None` for a no-op.
    pub async fn update(
        &self,
        file_stem: &FileStem,
        source: ChangeSource,
        f: impl FnOnce(Option<&Job>, u64) -> Option<JobEventKind>,
    ) -> Result<Job, StoreError> {
        let _row_guard = self.row_locks.get(file_stem).lock_owned().await;

        let now_ms = self.clock.epoch_ms();
        let current = self.state.read().get(file_stem).cloned();
        let Some(kind) = f(current.as_ref(), now_ms) else {
            return current.ok_or_else(|| StoreError::Job(JobError::NotFound(file_stem.clone())));
        };

        let event =
            JobEvent { file_stem: file_stem.clone(), source, at_ms: now_ms, kind };
        self.commit(event).await
    }

    pub async fn delete(&self, file_stem: &FileStem) -> Result<(), StoreError> {
        let _row_guard = self.row_locks.get(file_stem).lock_owned().await;
        if !self.state.read().contains(file_stem) {
            return Err(StoreError::Job(JobError::NotFound(file_stem.clone())));
        }
        let now_ms = self.clock.epoch_ms();
        let event = JobEvent {
            file_stem: file_stem.clone(),
            source: ChangeSource::Operator,
            at_ms: now_ms,
            kind: JobEventKind::Deleted,
        };
        let mut wal = self.wal.lock().await;
        wal.append(&event)?;
        self.state.write().apply_event(&event);
        Ok(())
    }

    async fn commit(&self, event: JobEvent) -> Result<Job, StoreError> {
        let mut wal = self.wal.lock().await;
        wal.append(&event)?;
        drop(wal);

        self.state.write().apply_event(&event);
        let job = self
            .state
            .read()
            .get(&event.file_stem)
            .cloned()
            .ok_or_else(|| StoreError::RowVanished(event.file_stem.clone()))?;

        self.change_feed.publish(ChangeNotification {
            file_stem: event.file_stem,
            at_ms: event.at_ms,
            job: job.clone(),
        });
        Ok(job)
    }

    /// Compact the WAL into a fresh snapshot. Called periodically by the
    /// orchestrator's tick loop, not on every write.
    pub async fn checkpoint(&self) -> Result<(), StoreError> {
        let state = self.state.read().clone();
        let mut wal = self.wal.lock().await;
        self.checkpointer.checkpoint(&state, &mut wal)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

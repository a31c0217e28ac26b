// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reelforge-store: the durable Store — WAL, snapshot + migration,
//! materialized state, and the change feed that fans updates out to
//! `GET /jobs/stream` subscribers.

mod change_feed;
mod checkpoint;
mod migration;
mod snapshot;
mod state;
mod store;
mod wal;

pub use change_feed::{ChangeFeed, Subscription};
pub use checkpoint::{CheckpointError, Checkpointer};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{load_snapshot, write_snapshot, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use store::{JobFilter, Store, StoreError};
pub use wal::{Wal, WalEntry, WalError};

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Boundary adapters: everything that touches a subprocess, the
//! filesystem inbox, or the remote worker plane.

mod cloud_bridge;
mod inbox_scan;
mod local_runner;
mod object_store;

pub use cloud_bridge::{
    CloudBridge, CloudBridgeError, PollOutcome, ProgressDocument, ReviewDocument, RetryPolicy, SubmitRequest,
    SubmitResponse,
};
pub use inbox_scan::{InboxScanError, InboxWatcher, InboxWatcherConfig, StableFile};
pub use local_runner::{asr_idle_timeout, KilledReason, LocalRunner, RunError, RunOutcome, RunSpec};
pub use object_store::{write_atomic, LocalObjectStore, ObjectKey, ObjectStore, ObjectStoreError};

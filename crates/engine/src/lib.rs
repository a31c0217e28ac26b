// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The stage engine: the tick-driven scheduler that walks every
//! non-terminal job through its stage handler, the stall sweep that
//! recovers or kills jobs that idle past their stage's threshold, and
//! the liveness/reconciliation plumbing both depend on.
//!
//! Nothing in this crate touches the WAL or snapshot directly — it only
//! ever mutates state through [`reelforge_store::Store`], so every
//! transition it makes is itself durable and fans out over the
//! `ChangeFeed` the same as an operator action would.

pub mod cloud_link;
mod engine;
pub mod handlers;
pub mod heartbeat;
pub mod paths;
pub mod probe;
pub mod reconcile;
mod stall_detector;

pub use engine::{run, CancellationRegistry, StageEngine};
pub use handlers::HandlerCtx;
pub use heartbeat::HeartbeatPublisher;
pub use stall_detector::StallDetector;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reelforge-core: domain types shared by every `reelforge` crate — the
//! `Job` aggregate, its `Stage` machine, durable `JobEvent`s, and
//! `OrchestratorConfig`. No I/O and no ambient global state — an explicit
//! context carries Store, Config, Clock, and Logger dependencies instead of
//! module-level singletons.

pub mod macros;

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod file_stem;
pub mod id;
pub mod ids;
pub mod job;
pub mod stage;
pub mod stage_outcome;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    CloudTrigger, CollaboratorCommand, CollaboratorCommands, ConfigError, OrchestratorConfig, StageLimits,
};
pub use error::JobError;
pub use event::{ChangeNotification, ChangeSource, JobEvent, JobEventKind};
pub use file_stem::FileStem;
pub use id::{short, IdBuf};
pub use ids::{ActionId, WalEntryId};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{
    CloudProgress, ErrorLogEntry, Job, JobConfig, JobConfigBuilder, JobMeta, StageTimelineEntry,
    StatusTimelineEntry, ERROR_LOG_CAP, STATUS_TIMELINE_CAP,
};
pub use stage::Stage;
pub use stage_outcome::{MetaPatch, StageOutcome};
pub use time_fmt::{format_elapsed, format_elapsed_ms};

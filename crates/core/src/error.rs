// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Shared domain error type for job-state operations, reused by the Store,
//! engine, and ControlAPI.

use crate::file_stem::FileStem;
use crate::stage::Stage;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("no job with file_stem '{0}'")]
    NotFound(FileStem),

    #[error("job '{0}' already exists")]
    AlreadyExists(FileStem),

    #[error("job '{file_stem}' is in terminal stage '{stage}' and does not accept '{action}'")]
    InvalidForStage { file_stem: FileStem, stage: Stage, action: &'static str },

    #[error("job '{file_stem}' failed schema/invariant validation on load: {reason}")]
    Corrupt { file_stem: FileStem, reason: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

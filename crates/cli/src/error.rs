// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Maps ControlAPI failures onto process exit codes, matching the
//! convention a shell pipeline expects: 0 success, 1 request/transport
//! failure, 2 the daemon rejected the request (4xx/5xx body decoded into
//! a [`reelforge_wire::ApiError`]).

use reelforge_wire::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("request to the daemon failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("daemon rejected the request: {0}")]
    Api(ApiError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Transport(_) => 1,
            CliError::Api(_) => 2,
        }
    }
}

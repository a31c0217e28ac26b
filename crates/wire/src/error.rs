// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The uniform error body every ControlAPI endpoint returns on failure.
//! Kept as a plain DTO here (not an axum `IntoResponse`) so `reelforge-cli`
//! can deserialize it without depending on axum at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

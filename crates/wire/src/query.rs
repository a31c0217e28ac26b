// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Query-string parameters accepted by `GET /jobs`.

use reelforge_core::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobsQuery {
    #[serde(default)]
    pub stage: Option<Stage>,
    /// Case-sensitive substring match against `Job::status`.
    #[serde(default)]
    pub status_contains: Option<String>,
    /// Only jobs whose `updated_at_ms` is strictly greater than this.
    #[serde(default)]
    pub updated_after_ms: Option<u64>,
}

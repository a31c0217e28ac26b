// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Body of a successful `POST /upload` response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadAccepted {
    pub filename: String,
    pub bytes: u64,
}

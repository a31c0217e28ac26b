// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Liveness timestamps for an external watchdog: two plain files,
//! rewritten atomically every tick, one per monitored component. The
//! watchdog doesn't link against this crate — it just stats the file
//! and compares its mtime/contents against an age threshold — so the
//! format is deliberately a bare epoch-millis string, not JSON.

use std::path::{Path, PathBuf};

const ORCHESTRATOR_FILE: &str = "heartbeat_orchestrator";
const CONTROL_API_FILE: &str = "heartbeat_control_api";

pub struct HeartbeatPublisher {
    orchestrator_path: PathBuf,
    control_api_path: PathBuf,
}

impl HeartbeatPublisher {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            orchestrator_path: work_dir.join(ORCHESTRATOR_FILE),
            control_api_path: work_dir.join(CONTROL_API_FILE),
        }
    }

    pub fn orchestrator_path(&self) -> &Path {
        &self.orchestrator_path
    }

    pub fn control_api_path(&self) -> &Path {
        &self.control_api_path
    }

    /// Stamp both heartbeat files with `now_ms`. Both writes go through
    /// the same write-then-rename path every other artifact uses, so a
    /// watchdog never reads a half-written timestamp.
    pub async fn publish(&self, now_ms: u64) -> std::io::Result<()> {
        let payload = now_ms.to_string();
        reelforge_adapters::write_atomic(&self.orchestrator_path, payload.as_bytes()).await?;
        reelforge_adapters::write_atomic(&self.control_api_path, payload.as_bytes()).await?;
        Ok(())
    }

    /// How long ago `path` was last stamped, or `None` if it has never
    /// been written (or is unreadable/malformed).
    pub async fn age_ms(path: &Path, now_ms: u64) -> Option<u64> {
        let bytes = tokio::fs::read(path).await.ok()?;
        let text = std::str::from_utf8(&bytes).ok()?;
        let written: u64 = text.trim().parse().ok()?;
        Some(now_ms.saturating_sub(written))
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;

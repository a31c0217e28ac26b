// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Watches the inbox directory for new source media and decides when a
//! file is safe to ingest: it must stop growing across a run of probes
//! spaced `stability_delay` apart, and it must already be at least
//! `min_age` old by mtime, so a file still being copied in isn't picked
//! up mid-write. Files with a `DONE_` prefix or an extension outside the
//! configured allowlist are skipped outright, and a stem already known
//! to the store is never re-ingested.

use reelforge_core::FileStem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;

const DONE_PREFIX: &str = "DONE_";

#[derive(Debug, Error)]
pub enum InboxScanError {
    #[error("failed to read inbox directory {path}: {source}")]
    ReadDir { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to stat {path}: {source}")]
    Metadata { path: PathBuf, #[source] source: std::io::Error },
}

#[derive(Debug, Clone)]
pub struct InboxWatcherConfig {
    pub extensions: Vec<String>,
    pub stability_probes: u32,
    pub stability_delay: Duration,
    pub min_age: Duration,
}

impl Default for InboxWatcherConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mp4".into(), "mov".into(), "mkv".into(), "wav".into(), "mp3".into()],
            stability_probes: 3,
            stability_delay: Duration::from_secs(1),
            min_age: Duration::from_secs(3),
        }
    }
}

/// A candidate file that has passed every stability check and is ready
/// to become a job.
#[derive(Debug, Clone)]
pub struct StableFile {
    pub path: PathBuf,
    pub file_stem: FileStem,
}

pub struct InboxWatcher {
    inbox_dir: PathBuf,
    config: InboxWatcherConfig,
}

impl InboxWatcher {
    pub fn new(inbox_dir: PathBuf, config: InboxWatcherConfig) -> Self {
        Self { inbox_dir, config }
    }

    fn is_eligible_name(&self, name: &str) -> bool {
        if name.starts_with(DONE_PREFIX) {
            return false;
        }
        let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        matches!(ext, Some(ext) if self.config.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }

    /// List every inbox entry currently eligible by name, keyed by path.
    fn candidates(&self) -> Result<Vec<PathBuf>, InboxScanError> {
        let mut out = Vec::new();
        let entries = std::fs::read_dir(&self.inbox_dir)
            .map_err(|source| InboxScanError::ReadDir { path: self.inbox_dir.clone(), source })?;
        for entry in entries {
            let entry = entry.map_err(|source| InboxScanError::ReadDir {
                path: self.inbox_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            if self.is_eligible_name(name) {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    fn file_size_and_age(&self, path: &Path, now: SystemTime) -> Result<(u64, Duration), InboxScanError> {
        let meta = std::fs::metadata(path)
            .map_err(|source| InboxScanError::Metadata { path: path.to_path_buf(), source })?;
        let modified = meta.modified().unwrap_or(now);
        let age = now.duration_since(modified).unwrap_or_default();
        Ok((meta.len(), age))
    }

    /// Probe every eligible candidate `stability_probes` times, spaced
    /// `stability_delay` apart, and return those whose size never
    /// changed across the run and that already clear `min_age`.
    ///
    /// `already_known` filters out file stems the store already has a
    /// job for, so a file left sitting in the inbox after ingestion
    /// doesn't get re-submitted every scan.
    pub async fn scan(
        &self,
        already_known: impl Fn(&FileStem) -> bool,
    ) -> Result<Vec<StableFile>, InboxScanError> {
        let candidates = self.candidates()?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut sizes: HashMap<PathBuf, u64> = HashMap::new();
        let mut stable_across_all_probes: HashMap<PathBuf, bool> =
            candidates.iter().cloned().map(|p| (p, true)).collect();

        for probe in 0..self.config.stability_probes {
            let now = SystemTime::now();
            for path in &candidates {
                let (size, age) = match self.file_size_and_age(path, now) {
                    Ok(v) => v,
                    Err(_) => {
                        stable_across_all_probes.insert(path.clone(), false);
                        continue;
                    }
                };
                if age < self.config.min_age {
                    stable_across_all_probes.insert(path.clone(), false);
                }
                if let Some(prev) = sizes.insert(path.clone(), size) {
                    if prev != size {
                        stable_across_all_probes.insert(path.clone(), false);
                    }
                }
            }
            if probe + 1 < self.config.stability_probes {
                tokio::time::sleep(self.config.stability_delay).await;
            }
        }

        let mut out = Vec::new();
        for path in candidates {
            if !stable_across_all_probes.get(&path).copied().unwrap_or(false) {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            let file_stem = FileStem::from_filename(name);
            if already_known(&file_stem) {
                continue;
            }
            out.push(StableFile { path, file_stem });
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "inbox_scan_tests.rs"]
mod tests;

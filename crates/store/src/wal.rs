// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Write-ahead log of [`JobEvent`]s.
//!
//! Every Store mutation is appended here before it is considered durable:
//! a write only returns once it has been fsynced. Each line is
//! `seq\tsha256-hex\tjson` so a truncated trailing write (crash mid-append)
//! is detected by checksum mismatch and dropped rather than corrupting
//! replay.

use reelforge_core::JobEvent;
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("wal io error: {0}")]
    Io(#[from] io::Error),
    #[error("wal entry {0} failed checksum verification")]
    Checksum(u64),
    #[error("wal entry serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One committed line of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct WalEntry {
    pub seq: u64,
    pub event: JobEvent,
}

fn checksum(seq: u64, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Append-only log backing the Store. `write_seq` is the sequence number of
/// the last entry appended this process; `processed_seq` is the sequence
/// number up to which the materialized state has been built (used by
/// `Checkpointer` to know where replay should resume).
pub struct Wal {
    file: File,
    path: PathBuf,
    write_seq: u64,
    processed_seq: u64,
}

impl Wal {
    /// Open (creating if absent) the log at `path`. `processed_seq` seeds
    /// the replay cursor — pass the sequence number recorded in the last
    /// loaded snapshot.
    pub fn open(path: &Path, processed_seq: u64) -> Result<Self, WalError> {
        let file = OpenOptions::new().create(true).append(true).read(true).open(path)?;
        let mut wal = Self { file, path: path.to_path_buf(), write_seq: 0, processed_seq };
        wal.write_seq = wal.recover_tail()?;
        Ok(wal)
    }

    /// Scan the log for its last valid sequence number, dropping a
    /// crash-torn trailing write rather than erroring. A line that fails
    /// checksum verification is exactly what `append`'s fsync-before-return
    /// contract is meant to prevent from ever being *read back* as good
    /// data — it means the process died mid-`writeln!` — so scanning stops
    /// there and the file is truncated back to the last valid entry, the
    /// same way a real WAL recovers from a torn write instead of refusing
    /// to start.
    fn recover_tail(&self) -> Result<u64, WalError> {
        let (last_seq, valid_len) = scan_valid_prefix(&self.path)?;
        let actual_len = std::fs::metadata(&self.path)?.len();
        if valid_len < actual_len {
            let file = OpenOptions::new().write(true).open(&self.path)?;
            file.set_len(valid_len)?;
        }
        Ok(last_seq)
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    /// Append one event, fsync'd before returning — the write is durable by
    /// the time the caller observes success.
    pub fn append(&mut self, event: &JobEvent) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let payload = serde_json::to_string(event)?;
        let sum = checksum(seq, &payload);
        writeln!(self.file, "{seq}\t{sum}\t{payload}")?;
        self.file.flush()?;
        self.file.sync_data()?;
        self.write_seq = seq;
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        Ok(())
    }

    /// Replay entries with `seq > processed_seq`, in order. By the time
    /// this runs the file has already been through `recover_tail` (via
    /// `open`), so every remaining line on disk is checksum-valid.
    pub fn replay_unprocessed(&self) -> Result<Vec<WalEntry>, WalError> {
        let processed = self.processed_seq;
        read_entries(&self.path)?.filter(|e| !matches!(e, Ok(e) if e.seq <= processed)).collect()
    }

    /// Truncate the log entirely. Used after a snapshot has durably
    /// captured everything the log held.
    pub fn truncate(&mut self) -> Result<(), WalError> {
        self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        self.file = OpenOptions::new().create(true).append(true).read(true).open(&self.path)?;
        Ok(())
    }
}

/// Walk the log from the start, validating each line's checksum in order,
/// and stop at the first one that fails (or doesn't parse at all). Returns
/// the last valid sequence number seen and the byte length of the file up
/// to and including that entry — the caller truncates the file to that
/// length, dropping whatever comes after as a torn trailing write.
fn scan_valid_prefix(path: &Path) -> Result<(u64, u64), WalError> {
    let file = OpenOptions::new().read(true).create(true).write(true).open(path)?;
    let reader = BufReader::new(file);
    let mut last_seq = 0u64;
    let mut valid_len: u64 = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        match parse_line(&line) {
            Ok(entry) => {
                last_seq = entry.seq;
                valid_len += line.len() as u64 + 1;
            }
            Err(_) => break,
        }
    }
    Ok((last_seq, valid_len))
}

fn read_entries(path: &Path) -> Result<impl Iterator<Item = Result<WalEntry, WalError>>, WalError> {
    let file = OpenOptions::new().read(true).create(true).write(true).open(path)?;
    let reader = BufReader::new(file);
    Ok(reader.lines().filter_map(|line| {
        let line = match line {
            Ok(l) => l,
            Err(e) => return Some(Err(e.into())),
        };
        if line.is_empty() {
            return None;
        }
        Some(parse_line(&line))
    }))
}

fn parse_line(line: &str) -> Result<WalEntry, WalError> {
    let mut parts = line.splitn(3, '\t');
    let seq: u64 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| WalError::Io(io::Error::new(io::ErrorKind::InvalidData, "missing seq")))?;
    let sum = parts
        .next()
        .ok_or_else(|| WalError::Io(io::Error::new(io::ErrorKind::InvalidData, "missing sum")))?;
    let payload = parts
        .next()
        .ok_or_else(|| WalError::Io(io::Error::new(io::ErrorKind::InvalidData, "missing body")))?;
    if checksum(seq, payload) != sum {
        return Err(WalError::Checksum(seq));
    }
    let event: JobEvent = serde_json::from_str(payload)?;
    Ok(WalEntry { seq, event })
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;

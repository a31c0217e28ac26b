// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Reads just enough of a WAV file's header to know its duration, so the
//! ASR idle-timeout can scale with it. No external prober: the audio
//! extractor always emits a canonical RIFF/WAVE file, so a tiny header
//! walk is all that's needed.

use std::path::Path;
use std::time::Duration;

pub async fn wav_duration(path: &Path) -> std::io::Result<Duration> {
    let bytes = tokio::fs::read(path).await?;
    Ok(duration_from_header(&bytes).unwrap_or_default())
}

fn duration_from_header(bytes: &[u8]) -> Option<Duration> {
    if bytes.len() < 44 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }
    let byte_rate = u32::from_le_bytes(bytes.get(28..32)?.try_into().ok()?);
    if byte_rate == 0 {
        return None;
    }

    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let chunk_id = bytes.get(offset..offset + 4)?;
        let chunk_size = u32::from_le_bytes(bytes.get(offset + 4..offset + 8)?.try_into().ok()?) as usize;
        if chunk_id == b"data" {
            return Some(Duration::from_secs_f64(chunk_size as f64 / byte_rate as f64));
        }
        offset += 8 + chunk_size + (chunk_size % 2);
    }
    None
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;

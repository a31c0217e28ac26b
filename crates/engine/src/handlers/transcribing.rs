// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `Transcribing`: run ASR against the extracted audio track, with an
//! idle timeout scaled to the track's own duration so a long program
//! doesn't get killed for merely taking a while to transcribe.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelforge_adapters::asr_idle_timeout;
use reelforge_core::{Clock, Job, Stage, StageOutcome};

use super::command;
use super::HandlerCtx;
use crate::paths;
use crate::probe;

pub async fn handle<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    let audio_in = paths::audio_path(&ctx.config, &job.file_stem);
    let skeleton_out = paths::skeleton_path(&ctx.config, &job.file_stem);

    let duration = probe::wav_duration(&audio_in).await.unwrap_or_default();
    let idle_timeout = asr_idle_timeout(duration, ctx.config.asr_idle_timeout_seconds);

    let mut spec = command::spec_for(
        &ctx.config.commands.asr,
        ctx.config.work_dir.clone(),
        &audio_in,
        &skeleton_out,
    );
    spec.idle_timeout = idle_timeout;

    match ctx.local_runner.run(spec, cancel.clone()).await {
        Ok(outcome) if outcome.success() => {
            StageOutcome::transition(Stage::Transcribed, "transcription complete")
        }
        Ok(outcome) if outcome.killed_reason.is_some() => StageOutcome::retry(
            format!("asr killed: {:?}", outcome.killed_reason),
            Duration::from_secs(30),
        ),
        Ok(outcome) => StageOutcome::retry(
            outcome.first_error_line.unwrap_or_else(|| "asr exited non-zero".to_string()),
            Duration::from_secs(30),
        ),
        Err(e) => StageOutcome::retry(format!("transcribing: {e}"), Duration::from_secs(30)),
    }
}

#[cfg(test)]
#[path = "transcribing_tests.rs"]
mod tests;

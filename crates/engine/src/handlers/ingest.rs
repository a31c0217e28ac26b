// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `Ingest`: move the source file into the vault, then extract its audio
//! track.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelforge_core::{Clock, Job, Stage, StageOutcome};

use super::command;
use super::HandlerCtx;
use crate::paths;

pub async fn handle<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    let Some(source_path) = job.meta.source_path.clone() else {
        return StageOutcome::fatal("ingest: job has no recorded source path");
    };

    let ext = source_path.extension().and_then(|e| e.to_str()).unwrap_or("bin");
    let vaulted = paths::source_path(&ctx.config, &job.file_stem, ext);

    if tokio::fs::try_exists(&vaulted).await.unwrap_or(false) {
        // A previous attempt already moved it in; don't fail on retry.
    } else if let Some(parent) = vaulted.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return StageOutcome::retry(format!("ingest: creating vault dir: {e}"), Duration::from_secs(5));
        }
        if let Err(e) = tokio::fs::rename(&source_path, &vaulted).await {
            return StageOutcome::retry(format!("ingest: moving source into vault: {e}"), Duration::from_secs(5));
        }
    }

    let audio_out = paths::audio_path(&ctx.config, &job.file_stem);
    let spec = command::spec_for(
        &ctx.config.commands.audio_extract,
        ctx.config.work_dir.clone(),
        &vaulted,
        &audio_out,
    );

    match ctx.local_runner.run(spec, cancel.clone()).await {
        Ok(outcome) if outcome.success() => {
            StageOutcome::transition(Stage::Transcribing, "audio extracted")
        }
        Ok(outcome) => StageOutcome::retry(
            outcome.first_error_line.unwrap_or_else(|| "audio extraction exited non-zero".to_string()),
            Duration::from_secs(30),
        ),
        Err(e) => StageOutcome::retry(format!("ingest: {e}"), Duration::from_secs(30)),
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;

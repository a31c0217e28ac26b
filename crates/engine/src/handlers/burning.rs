// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `Burning`: burn the finalized captions onto the source video, writing
//! the result into the delivery directory.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelforge_core::{Clock, Job, Stage, StageOutcome};

use super::command;
use super::HandlerCtx;
use crate::paths;

pub async fn handle<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    let ext = job
        .meta
        .source_path
        .as_ref()
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or("mp4")
        .to_string();

    let source_video = paths::source_path(&ctx.config, &job.file_stem, &ext);
    let finalized = paths::finalized_path(&ctx.config, &job.file_stem);
    let delivery = paths::delivery_path(&ctx.config, &job.file_stem, &ext);

    let spec = command::spec_with(
        &ctx.config.commands.burner,
        ctx.config.work_dir.clone(),
        &[("{video}", &source_video), ("{captions}", &finalized), ("{output}", &delivery)],
    );

    match ctx.local_runner.run(spec, cancel.clone()).await {
        Ok(outcome) if outcome.success() => StageOutcome::transition(Stage::Completed, "burned"),
        Ok(outcome) => StageOutcome::retry(
            outcome.first_error_line.unwrap_or_else(|| "burner exited non-zero".to_string()),
            Duration::from_secs(30),
        ),
        Err(e) => StageOutcome::retry(format!("burning: {e}"), Duration::from_secs(30)),
    }
}

#[cfg(test)]
#[path = "burning_tests.rs"]
mod tests;

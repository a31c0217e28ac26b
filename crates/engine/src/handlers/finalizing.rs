// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `Finalizing`: run the finalizer over the approved translation, which
//! is expected to produce the final subtitle/caption document the
//! burner will consume next.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelforge_core::{Clock, Job, Stage, StageOutcome};

use super::command;
use super::HandlerCtx;
use crate::paths;

pub async fn handle<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    let approved = paths::approved_path(&ctx.config, &job.file_stem);
    let finalized = paths::finalized_path(&ctx.config, &job.file_stem);

    let spec = command::spec_for(&ctx.config.commands.finalizer, ctx.config.work_dir.clone(), &approved, &finalized);

    match ctx.local_runner.run(spec, cancel.clone()).await {
        Ok(outcome) if outcome.success() => StageOutcome::transition(Stage::Finalized, "finalized"),
        Ok(outcome) => StageOutcome::retry(
            outcome.first_error_line.unwrap_or_else(|| "finalizer exited non-zero".to_string()),
            Duration::from_secs(30),
        ),
        Err(e) => StageOutcome::retry(format!("finalizing: {e}"), Duration::from_secs(30)),
    }
}

#[cfg(test)]
#[path = "finalizing_tests.rs"]
mod tests;

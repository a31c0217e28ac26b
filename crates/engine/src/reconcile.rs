// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! "The filesystem wins for done artifacts": before dispatching a job to
//! its stage handler, check whether the artifact that stage is supposed
//! to produce already exists on disk. If it does, advance past the
//! handler instead of re-running it — covers both an ordinary race
//! (another tick already finished the work) and a restart landing
//! mid-stage with the artifact already written.

use reelforge_core::{Clock, Job, Stage, StageOutcome};

use crate::handlers::HandlerCtx;
use crate::paths;

pub async fn check<C: Clock>(job: &Job, ctx: &HandlerCtx<C>) -> Option<StageOutcome> {
    let next_artifact = match job.stage {
        Stage::Ingest => paths::audio_path(&ctx.config, &job.file_stem),
        Stage::Transcribing => paths::skeleton_path(&ctx.config, &job.file_stem),
        Stage::Burning => {
            let ext = job
                .meta
                .source_path
                .as_ref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .unwrap_or("mp4");
            paths::delivery_path(&ctx.config, &job.file_stem, ext)
        }
        _ => return None,
    };

    if !tokio::fs::try_exists(&next_artifact).await.unwrap_or(false) {
        return None;
    }

    let next_stage = job.stage.next()?;
    Some(StageOutcome::transition(next_stage, "reconciled from existing artifact"))
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;

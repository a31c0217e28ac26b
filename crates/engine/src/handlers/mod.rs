// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Stage handlers: one module per stage family, each returning a
//! [`StageOutcome`] instead of mutating the job or calling back into the
//! engine directly.

mod burning;
mod cloud;
mod command;
mod finalizing;
mod ingest;
mod reviewing;
mod transcribing;

use reelforge_adapters::{CloudBridge, LocalRunner, ObjectStore};
use reelforge_core::{Clock, Job, OrchestratorConfig, Stage, StageOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared dependencies every handler (and the reconciler) needs. Cheap
/// to clone: everything inside is already behind an `Arc`.
#[derive(Clone)]
pub struct HandlerCtx<C: Clock> {
    pub config: Arc<OrchestratorConfig>,
    pub local_runner: Arc<LocalRunner>,
    pub cloud: Arc<CloudBridge>,
    pub objects: Arc<dyn ObjectStore>,
    pub clock: C,
}

/// Dispatch `job` to the handler for its current stage. `Reviewing` and
/// `Reviewed` are only ever entered when `job.meta.review_required` was
/// set at the `CloudDone`/pre-`Finalizing` boundary; this dispatcher
/// doesn't special-case that — it trusts the stage the job is already in.
///
/// `cancel` is the job-scoped cancellation token the tick loop hands to
/// every handler that may spawn a `LocalRunner` invocation, so an
/// operator `cancel`/`halt` action or a `StallDetector` recovery can
/// unwind whatever subprocess is in flight for this job.
pub async fn dispatch<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    match job.stage {
        Stage::Ingest => ingest::handle(job, ctx, cancel).await,
        Stage::Transcribing => transcribing::handle(job, ctx, cancel).await,
        Stage::Transcribed => cloud::handle_transcribed(job, ctx, cancel).await,
        Stage::TranslatingCloudSubmitted
        | Stage::CloudTranslating
        | Stage::CloudReviewing
        | Stage::CloudPolishing => cloud::handle_poll(job, ctx).await,
        Stage::CloudDone => cloud::handle_done(job, ctx).await,
        Stage::Reviewing => reviewing::handle(job, ctx).await,
        Stage::Reviewed => StageOutcome::transition(Stage::Finalizing, "entering finalizer"),
        Stage::Finalizing => finalizing::handle(job, ctx, cancel).await,
        Stage::Finalized => StageOutcome::transition(Stage::Burning, "entering burner"),
        Stage::Burning => burning::handle(job, ctx, cancel).await,
        // Terminal or operator-controlled stages never reach the handler
        // dispatcher — the tick loop filters them out beforehand.
        Stage::Completed | Stage::Delivered | Stage::Dead | Stage::Halted => StageOutcome::Wait,
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

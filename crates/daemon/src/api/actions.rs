// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `POST /action` (spec.md §4.8): the fixed operator action set, each
//! dispatched to the one `Store::update`/`Store::delete` call that
//! expresses it as an event.

use axum::extract::State;
use axum::Json;
use reelforge_core::{ChangeSource, FileStem, Job, JobEventKind, Stage};
use reelforge_wire::{Action, ActionAccepted};

use crate::context::DaemonContext;
use crate::error::ApiHttpError;

pub async fn handle(
    State(ctx): State<DaemonContext>,
    Json(action): Json<Action>,
) -> Result<Json<ActionAccepted>, ApiHttpError> {
    let file_stem = action.file_stem().to_string();
    let stem = FileStem::from(file_stem.as_str());

    match action {
        Action::Retry { .. } => {
            let current = ctx
                .store
                .get(&stem)
                .ok_or_else(|| ApiHttpError::not_found(format!("no job with file_stem '{file_stem}'")))?;
            let target = retry_target_stage(&current);
            ctx.store
                .update(&stem, ChangeSource::Operator, move |cur, _now| {
                    cur?;
                    Some(JobEventKind::Retried { stage: target })
                })
                .await?;
        }
        Action::Cancel { .. } => {
            ctx.cancellations.cancel(&stem);
            ctx.store
                .update(&stem, ChangeSource::Operator, |cur, _now| {
                    cur?;
                    Some(JobEventKind::StatusUpdated { status: "cancelled by operator".to_string() })
                })
                .await?;
        }
        Action::Halt { .. } => {
            ctx.cancellations.cancel(&stem);
            ctx.store
                .update(&stem, ChangeSource::Operator, |cur, _now| {
                    cur?;
                    Some(JobEventKind::Halted)
                })
                .await?;
        }
        Action::Resume { .. } => {
            ctx.store
                .update(&stem, ChangeSource::Operator, |cur, _now| {
                    cur?;
                    Some(JobEventKind::Resumed)
                })
                .await?;
        }
        Action::ReBurn { .. } => {
            let job = ctx
                .store
                .get(&stem)
                .ok_or_else(|| ApiHttpError::not_found(format!("no job with file_stem '{file_stem}'")))?;
            let ext = job
                .meta
                .source_path
                .as_ref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .unwrap_or("mp4");
            let delivery_path = reelforge_engine::paths::delivery_path(&ctx.config, &stem, ext);
            // Best effort: if it's already gone there's nothing to undo.
            let _ = tokio::fs::remove_file(&delivery_path).await;
            ctx.store
                .update(&stem, ChangeSource::Operator, |cur, _now| {
                    cur?;
                    Some(JobEventKind::Transitioned {
                        next: Stage::Finalized,
                        status: "re-burn requested by operator".to_string(),
                    })
                })
                .await?;
        }
        Action::MarkDelivered { .. } => {
            ctx.store
                .update(&stem, ChangeSource::Operator, |cur, _now| {
                    cur?;
                    Some(JobEventKind::Transitioned {
                        next: Stage::Delivered,
                        status: "marked delivered by operator".to_string(),
                    })
                })
                .await?;
        }
        Action::Delete { .. } => {
            ctx.store.delete(&stem).await?;
        }
        Action::ForceStage { stage, .. } => {
            // Forcing a job out of `Reviewing` is how an operator signs off
            // a review by hand (spec.md §4.5/§4.8); clear the flag an
            // operator action always wins on before the transition lands.
            let current = ctx
                .store
                .get(&stem)
                .ok_or_else(|| ApiHttpError::not_found(format!("no job with file_stem '{file_stem}'")))?;
            if current.stage == Stage::Reviewing {
                ctx.store
                    .update(&stem, ChangeSource::Operator, |cur, _now| {
                        cur?;
                        Some(JobEventKind::ReviewRequiredSet { value: false })
                    })
                    .await?;
            }
            ctx.store
                .update(&stem, ChangeSource::Operator, move |cur, _now| {
                    cur?;
                    Some(JobEventKind::Transitioned {
                        next: stage,
                        status: format!("force-staged to {stage} by operator"),
                    })
                })
                .await?;
        }
    }

    Ok(Json(ActionAccepted { file_stem }))
}

/// The stage a `retry` should re-enter: the job's current stage if it's
/// still alive, or the last non-`Dead` stage it occupied before dying.
fn retry_target_stage(job: &Job) -> Stage {
    if job.stage != Stage::Dead {
        return job.stage;
    }
    job.meta
        .stage_timeline
        .iter()
        .rev()
        .map(|entry| entry.stage)
        .find(|stage| *stage != Stage::Dead)
        .unwrap_or(Stage::Ingest)
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;

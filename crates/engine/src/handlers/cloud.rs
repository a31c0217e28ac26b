// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The cloud-translation leg: submit once from `Transcribed`, then mirror
//! progress from the remote worker's artifacts until it signals done.
//! When `cloud_pipeline` is off, the same downstream contract is produced
//! by a local command instead — same artifact, no remote call.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelforge_adapters::PollOutcome;
use reelforge_core::{Clock, Job, MetaPatch, Stage, StageOutcome};

use super::command;
use super::HandlerCtx;
use crate::cloud_link::{self, CloudLink};
use crate::paths;

pub async fn handle_transcribed<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    if !ctx.config.cloud_pipeline {
        return run_local_translation(job, ctx, cancel).await;
    }

    let Some(bucket) = ctx.config.jobs_bucket.clone() else {
        return StageOutcome::fatal("cloud_pipeline is enabled but jobs_bucket is unset");
    };
    let prefix = ctx.config.jobs_prefix.clone().unwrap_or_default();

    let skeleton = paths::skeleton_path(&ctx.config, &job.file_stem);
    let source_uri = skeleton.to_string_lossy().into_owned();
    let target_languages = [job.config.target_language.clone()];
    let request = reelforge_adapters::SubmitRequest {
        file_stem: job.file_stem.as_str(),
        source_uri: &source_uri,
        target_languages: &target_languages,
    };

    match ctx.cloud.submit(ctx.config.cloud_trigger, &request, &ctx.config.commands.cloud_trigger, &bucket, &prefix).await {
        Ok(response) => {
            let link = CloudLink { bucket, prefix, cloud_job_id: response.cloud_job_id };
            let link_path = paths::cloud_link_path(&ctx.config, &job.file_stem);
            if let Err(e) = cloud_link::write(&link_path, &link).await {
                return StageOutcome::retry(format!("recording cloud link: {e}"), Duration::from_secs(5));
            }
            StageOutcome::transition(Stage::TranslatingCloudSubmitted, "submitted to cloud")
        }
        Err(e) => StageOutcome::retry(format!("cloud submit: {e}"), Duration::from_secs(60)),
    }
}

async fn run_local_translation<C: Clock>(job: &Job, ctx: &HandlerCtx<C>, cancel: &CancellationToken) -> StageOutcome {
    let skeleton = paths::skeleton_path(&ctx.config, &job.file_stem);
    let approved = paths::approved_path(&ctx.config, &job.file_stem);
    let spec = command::spec_for(&ctx.config.commands.translator, ctx.config.work_dir.clone(), &skeleton, &approved);

    match ctx.local_runner.run(spec, cancel.clone()).await {
        Ok(outcome) if outcome.success() => {
            StageOutcome::transition(Stage::CloudDone, "local translation complete")
        }
        Ok(outcome) => StageOutcome::retry(
            outcome.first_error_line.unwrap_or_else(|| "local translation exited non-zero".to_string()),
            Duration::from_secs(30),
        ),
        Err(e) => StageOutcome::retry(format!("local translation: {e}"), Duration::from_secs(30)),
    }
}

/// Poll the remote worker's artifacts for the cloud-leg stages
/// (`TranslatingCloudSubmitted`/`CloudTranslating`/`CloudReviewing`/
/// `CloudPolishing`). Never mutates remote state.
pub async fn handle_poll<C: Clock>(job: &Job, ctx: &HandlerCtx<C>) -> StageOutcome {
    let link_path = paths::cloud_link_path(&ctx.config, &job.file_stem);
    let link = match cloud_link::read(&link_path).await {
        Ok(Some(link)) => link,
        Ok(None) => return StageOutcome::retry("cloud link not recorded yet", Duration::from_secs(5)),
        Err(e) => return StageOutcome::retry(format!("reading cloud link: {e}"), Duration::from_secs(5)),
    };

    let base = link.object_key(String::new());
    match ctx.cloud.poll(ctx.objects.as_ref(), &base).await {
        Ok(PollOutcome::Approved) => StageOutcome::transition(Stage::CloudDone, "cloud worker signaled done"),
        Ok(PollOutcome::NotReady) => StageOutcome::Wait,
        Ok(PollOutcome::Progress(doc)) => match Stage::mirror_cloud(&doc.stage) {
            Some(mirrored) if mirrored != job.stage => {
                StageOutcome::transition(mirrored, format!("cloud: {}", doc.stage))
            }
            _ => StageOutcome::progress(doc.progress, format!("cloud: {}", doc.stage)),
        },
        Err(e) => StageOutcome::retry(format!("polling cloud worker: {e}"), Duration::from_secs(30)),
    }
}

/// `CloudDone`: fetch the approved artifact (when the cloud leg produced
/// it) and decide whether the job needs a human review pass before
/// finalizing.
pub async fn handle_done<C: Clock>(job: &Job, ctx: &HandlerCtx<C>) -> StageOutcome {
    let mut meta = MetaPatch::default();

    if ctx.config.cloud_pipeline {
        let link_path = paths::cloud_link_path(&ctx.config, &job.file_stem);
        match cloud_link::read(&link_path).await {
            Ok(Some(link)) => {
                let key = link.object_key("approved.json");
                match ctx.cloud.fetch_approved(ctx.objects.as_ref(), &key).await {
                    Ok(bytes) => {
                        let approved_path = paths::approved_path(&ctx.config, &job.file_stem);
                        if let Err(e) = reelforge_adapters::write_atomic(&approved_path, &bytes).await {
                            return StageOutcome::retry(
                                format!("writing approved artifact: {e}"),
                                Duration::from_secs(5),
                            );
                        }
                    }
                    Err(e) => return StageOutcome::retry(format!("fetching approved artifact: {e}"), Duration::from_secs(30)),
                }

                // editor_report.json is optional (spec.md §3/§6.4): a
                // remote pipeline that skips the editor pass never writes
                // one, so a missing report is not a failure.
                let report_key = link.object_key("editor_report.json");
                match ctx.cloud.fetch_editor_report(ctx.objects.as_ref(), &report_key).await {
                    Ok(Some(report)) => meta.editor_report = Some(report),
                    Ok(None) => {}
                    Err(e) => {
                        return StageOutcome::retry(format!("fetching editor report: {e}"), Duration::from_secs(30))
                    }
                }
            }
            Ok(None) => return StageOutcome::retry("cloud link not recorded yet", Duration::from_secs(5)),
            Err(e) => return StageOutcome::retry(format!("reading cloud link: {e}"), Duration::from_secs(5)),
        }
    }

    if job.meta.review_required {
        StageOutcome::transition_with_meta(Stage::Reviewing, "awaiting human review", meta)
    } else {
        StageOutcome::transition_with_meta(Stage::Finalizing, "entering finalizer", meta)
    }
}

#[cfg(test)]
#[path = "cloud_tests.rs"]
mod tests;

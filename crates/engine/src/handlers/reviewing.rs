// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `Reviewing`: wait for `job.meta.review_required` to clear, per
//! spec.md §4.5's stage table. A job only reaches this stage when
//! `CloudDone` found the flag set; nothing here re-derives that
//! decision, it only watches for the flag to flip.
//!
//! The flag can flip two ways: an operator action forces it directly
//! (`ChangeSource::Operator`, always wins — see
//! `Job::set_review_required_by_operator`), or a remote reviewer drops a
//! `review.json` verdict (spec.md §6.4) that this handler polls for and
//! folds into the transition's `MetaPatch`.

use reelforge_core::{Clock, Job, MetaPatch, Stage, StageOutcome};

use super::HandlerCtx;
use crate::cloud_link;
use crate::paths;

pub async fn handle<C: Clock>(job: &Job, ctx: &HandlerCtx<C>) -> StageOutcome {
    if !job.meta.review_required {
        return StageOutcome::transition(Stage::Reviewed, "review submitted");
    }

    let link_path = paths::cloud_link_path(&ctx.config, &job.file_stem);
    let link = match cloud_link::read(&link_path).await {
        Ok(Some(link)) => link,
        Ok(None) | Err(_) => return StageOutcome::Wait,
    };

    let key = link.object_key("review.json");
    match ctx.cloud.fetch_review(ctx.objects.as_ref(), &key).await {
        Ok(Some(doc)) if doc.approved => {
            let meta = MetaPatch { review_required: Some(false), ..MetaPatch::default() };
            StageOutcome::transition_with_meta(Stage::Reviewed, "review submitted", meta)
        }
        Ok(_) | Err(_) => StageOutcome::Wait,
    }
}

#[cfg(test)]
#[path = "reviewing_tests.rs"]
mod tests;

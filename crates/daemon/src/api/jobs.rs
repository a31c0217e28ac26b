// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `GET /jobs` and `GET /jobs/{file_stem}` (spec.md §4.8).

use axum::extract::{Path, Query, State};
use axum::Json;
use reelforge_core::FileStem;
use reelforge_store::JobFilter;
use reelforge_wire::{JobDetail, JobSummary, JobsQuery};

use crate::context::DaemonContext;
use crate::error::ApiHttpError;

pub async fn list(State(ctx): State<DaemonContext>, Query(query): Query<JobsQuery>) -> Json<Vec<JobSummary>> {
    let filter = JobFilter {
        stage: query.stage,
        status_substring: query.status_contains,
        updated_after_ms: query.updated_after_ms,
    };
    let jobs = ctx.store.list(&filter);
    Json(jobs.iter().map(JobSummary::from_job).collect())
}

pub async fn show(
    State(ctx): State<DaemonContext>,
    Path(file_stem): Path<String>,
) -> Result<Json<JobDetail>, ApiHttpError> {
    let stem = FileStem::from(file_stem.as_str());
    let job = ctx
        .store
        .get(&stem)
        .ok_or_else(|| ApiHttpError::not_found(format!("no job with file_stem '{file_stem}'")))?;
    Ok(Json(JobDetail::from_job(&job)))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
